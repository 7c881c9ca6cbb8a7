//! Calculator interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: run state, configuration and the [`Interpreter`] driver
//! - [`statements`]: assignment, `read`, `write`, `if` and `check`
//! - [`loops`]: guarded `do ... od` loops
//! - [`expressions`]: checked integer expression evaluation
//! - [`errors`]: runtime error types
//!
//! # Execution Model
//!
//! Program state ([`State`]: memory, remaining input, output) is passed by
//! value into each statement and returned with a [`Status`]. A runtime error
//! appends its message to the output and stops the run; a failed `check`
//! leaves the nearest enclosing loop. When history is enabled, a snapshot is
//! recorded after every executed statement.

pub mod engine;
pub mod errors;
pub mod expressions;
pub mod loops;
pub mod statements;

pub use engine::{interpret, Interpreter, Run, RunConfig, State, Status};
pub use errors::RuntimeError;
