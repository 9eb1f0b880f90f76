//! Pyrite runtime model.
//!
//! The pieces both execution backends share, so that they agree on every
//! observable behaviour:
//!
//! - [`value`] - Dynamically typed values and how they print
//! - [`heap`] - Arena of environment frames
//! - [`ops`] - Operator semantics
//! - [`builtins`] - `print`
//! - [`config`] - Runtime limits
//! - [`error`] - Runtime fault kinds

#![warn(missing_docs)]

pub mod builtins;
pub mod config;
pub mod error;
pub mod heap;
pub mod ops;
pub mod value;

pub use builtins::Builtin;
pub use config::{DEFAULT_MAX_CALL_DEPTH, RuntimeConfig};
pub use error::{RuntimeErrorKind, RuntimeResult};
pub use heap::{FrameId, Heap, HeapStats};
pub use value::{Callable, Value};
