//! # Introduction
//!
//! llcalc is an LL(1) parser generator with a table-driven parser and an
//! interpreter for a small calculator language. Grammars are plain data; the
//! generator computes nullable, FIRST and FOLLOW sets, builds a prediction
//! table, and the parser runs any program against that table. Runs can be
//! recorded as a snapshot history and stepped through in a terminal UI built
//! with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Grammar → Knowledge → ParseTable
//!                           ↓
//! Source → Lexer → Parser → ParseTree → AST → Interpreter → Output (+ Snapshots → TUI)
//! ```
//!
//! 1. [`grammar`]: grammar model, FIRST/FOLLOW fixed point and the
//!    [`grammar::table::ParseTable`].
//! 2. [`parser`]: scanner, dual-stack LL(1) parser, concrete parse trees and
//!    lowering to the AST.
//! 3. [`interpreter`]: state-threading evaluator producing the program
//!    output and the unused-variable warning.
//! 4. [`memory`]: ordered variable cells with used flags.
//! 5. [`snapshot`]: per-statement history with a configurable memory limit.
//! 6. [`ui`]: ratatui-based step viewer; not part of the stable library API.
//!
//! ## Language
//!
//! ```text
//! read n
//! do check n > 0
//!    write n
//!    n := n - 1
//! od
//! ```
//!
//! Statements: `id := E`, `read id`, `write E`, `if R ... fi`, `do ... od`,
//! `check R`. Expressions use `+ - * /` over 64-bit integers and the
//! comparisons `== <> < > <= >=`.

pub mod grammar;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;

use grammar::table::ParseTable;
use parser::ast::Program;
use thiserror::Error;

pub use interpreter::interpret;
pub use parser::{lower, parse, try_parse};

/// Failure of the front end: scanning and parsing, or lowering.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] parser::SyntaxError),

    #[error(transparent)]
    Lower(#[from] parser::LowerError),
}

/// Parses and lowers `source` with `table`.
pub fn compile(table: &ParseTable, source: &str) -> Result<Program, CompileError> {
    let tree = try_parse(table, source)?;
    Ok(lower(&tree)?)
}
