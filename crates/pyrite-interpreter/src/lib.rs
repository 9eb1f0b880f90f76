//! Pyrite tree-walking interpreter.
//!
//! Executes a [`CheckedProgram`](pyrite_sema::CheckedProgram) directly from
//! its AST. Values, frames, operators and `print` come from
//! `pyrite-runtime`, shared with the bytecode backend.
//!
//! # Modules
//!
//! - [`eval`] - Statement execution and expression evaluation
//! - [`closure`] - Function values
//! - [`error`] - Located runtime errors

#![warn(missing_docs)]

pub mod closure;
pub mod error;
pub mod eval;

pub use closure::{Closure, InterpValue};
pub use error::{InterpResult, RuntimeError};
pub use eval::{Flow, Interpreter};
