//! Calculator source code front end
//!
//! This module turns source text into a [`Program`](ast::Program):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Table-driven LL(1) parsing (tokens → concrete parse tree)
//! - [`tree`]: Concrete parse tree definitions
//! - [`lower`]: Lowering (parse tree → AST)
//! - [`ast`]: AST node definitions
//!
//! # Parser Implementation
//!
//! The parser is generic over the grammar: it is driven entirely by a
//! [`ParseTable`](crate::grammar::table::ParseTable) built from grammar data,
//! so the same engine parses both the calculator and the extended calculator
//! language. Only [`lower`] knows the concrete shapes of those grammars.

pub mod ast;
pub mod lexer;
pub mod lower;
pub mod parse;
pub mod tree;

pub use lower::{lower, LowerError};
pub use parse::{parse, try_parse, Parser, SyntaxError};
pub use tree::ParseTree;
