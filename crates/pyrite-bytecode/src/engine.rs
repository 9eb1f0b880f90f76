//! Execution engines.

use crate::unit::{CodeLocation, ExecutableUnit};
use pyrite_runtime::RuntimeErrorKind;
use std::fmt;

/// Something that can run an [`ExecutableUnit`].
///
/// Engines stop at the first fault; the list form leaves room for engines
/// that collect more than one.
pub trait ExecutionEngine {
    /// Runs `unit` from the start of its module body.
    ///
    /// # Errors
    ///
    /// Returns the faults that stopped execution. Output written before a
    /// fault stays written.
    fn execute(&mut self, unit: &ExecutableUnit) -> Result<(), Vec<Fault>>;
}

/// A runtime fault at an instruction.
///
/// Resolve `location` through [`ExecutableUnit::resolve`] for the source
/// position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// What went wrong
    pub kind: RuntimeErrorKind,

    /// The instruction that faulted
    pub location: CodeLocation,
}

impl Fault {
    /// Creates a fault.
    #[must_use]
    pub const fn new(kind: RuntimeErrorKind, location: CodeLocation) -> Self {
        Self { kind, location }
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.kind, self.location)
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
