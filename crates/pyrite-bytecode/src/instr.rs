//! Instruction set.
//!
//! A stack machine: operands are pushed, operators pop them and push their
//! result. Names are symbols of the unit's name table; jump targets are
//! offsets into the enclosing function's code.

use pyrite_mem::Symbol;
use pyrite_syntax::ast::BinaryOp;
use std::fmt;

/// One instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    /// Push constant `n` of the unit's pool
    Const(u32),
    /// Push `None`
    None,
    /// Push the value bound to a name, searching outward from the current frame
    Load(Symbol),
    /// Pop a value and bind it in the current frame
    Store(Symbol),
    /// Push a closure of prototype `n` over the current frame
    MakeFunction(u32),
    /// Pop `n` arguments and then the callee; call it
    Call(u32),
    /// Pop the result and leave the current function
    Return,
    /// Discard the top of the stack
    Pop,
    /// Continue at the target offset
    Jump(u32),
    /// Pop a boolean; continue at the target offset if it is false
    JumpIfFalse(u32),
    /// Pop two operands and push the operator's result
    Binary(BinaryOp),
    /// Pop a number and push its negation
    Negate,
}

impl Instr {
    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Const(_) => "CONST",
            Self::None => "NONE",
            Self::Load(_) => "LOAD",
            Self::Store(_) => "STORE",
            Self::MakeFunction(_) => "MAKE_FUNCTION",
            Self::Call(_) => "CALL",
            Self::Return => "RETURN",
            Self::Pop => "POP",
            Self::Jump(_) => "JUMP",
            Self::JumpIfFalse(_) => "JUMP_IF_FALSE",
            Self::Binary(_) => "BINARY",
            Self::Negate => "NEGATE",
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.mnemonic();
        match self {
            Self::Const(n) | Self::MakeFunction(n) | Self::Call(n) => write!(f, "{name} {n}"),
            Self::Jump(target) | Self::JumpIfFalse(target) => write!(f, "{name} -> {target}"),
            Self::Load(sym) | Self::Store(sym) => write!(f, "{name} #{}", sym.as_u32()),
            Self::Binary(op) => write!(f, "{name} {op}"),
            Self::None | Self::Return | Self::Pop | Self::Negate => write!(f, "{name}"),
        }
    }
}
