//! Pyrite semantic analysis.
//!
//! Verifies that every name read in a program is declared in an enclosing
//! scope, that parameter lists hold no duplicates, and that `return` only
//! appears inside functions. A passing program is wrapped in a
//! [`CheckedProgram`], which is what the execution backends accept.
//!
//! # Modules
//!
//! - [`scope`] - Scope stack
//! - [`analyzer`] - The analysis pass
//! - [`error`] - Semantic errors

#![warn(missing_docs)]

pub mod analyzer;
pub mod error;
pub mod scope;

pub use analyzer::{CheckedProgram, analyze};
pub use error::{SemaResult, SemanticError};
