//! Table-driven LL(1) parser
//!
//! A pushdown automaton over two stacks kept in lock-step:
//!
//! - the **parse stack** holds [`StackEntry::Expect`] entries for symbols still
//!   to be recognized and [`StackEntry::Reduce`] markers recording where a
//!   nonterminal's right-hand side ends;
//! - the **attribute stack** holds finished tree fragments plus one empty
//!   placeholder node per nonterminal being expanded.
//!
//! Expanding `N → X1 … Xk` pushes a placeholder for `N`, then the `Xi` and a
//! `Reduce(k)` marker. When the marker surfaces, the `k` fragments above the
//! placeholder are exactly the children of `N`. The driver loop does not
//! recurse, whatever the nesting depth of the program.
//!
//! There is no error recovery: the first syntax error ends the parse.

use super::lexer::{LexTable, Lexer, Token, TokenKind};
use super::tree::ParseTree;
use crate::grammar::table::ParseTable;
use crate::parser::ast::SourceLocation;
use thiserror::Error;
use tracing::trace;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("syntax error at {location}: extra input beyond end of program")]
    ExtraInput { location: SourceLocation },

    #[error("syntax error at {location}: expected {expected}; saw {saw}")]
    Expected {
        expected: String,
        saw: String,
        location: SourceLocation,
    },

    #[error("syntax error at {location}: no prediction for {nonterminal} when seeing {saw}")]
    NoPrediction {
        nonterminal: String,
        saw: String,
        location: SourceLocation,
    },

    /// The two stacks fell out of step; a parser defect, not a user error
    #[error("internal parser error: {0}")]
    Internal(String),
}

/// Parse stack entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry<'t> {
    Expect(&'t str),
    Reduce(usize),
}

/// Table-driven parser for one grammar
pub struct Parser<'t> {
    table: &'t ParseTable,
    lex_table: LexTable,
}

impl<'t> Parser<'t> {
    pub fn new(table: &'t ParseTable) -> Self {
        Self::with_lex_table(table, LexTable::default())
    }

    pub fn with_lex_table(table: &'t ParseTable, lex_table: LexTable) -> Self {
        Parser { table, lex_table }
    }

    /// Parses `source`, printing a diagnostic line and returning
    /// [`ParseTree::Error`] on failure.
    pub fn parse(&self, source: &str) -> ParseTree {
        match self.try_parse(source) {
            Ok(tree) => tree,
            Err(e) => {
                eprintln!("{}", e);
                ParseTree::Error
            }
        }
    }

    pub fn try_parse(&self, source: &str) -> Result<ParseTree, SyntaxError> {
        let tokens = Lexer::new(source, &self.lex_table).tokenize();
        self.parse_tokens(&tokens)
    }

    /// Runs the automaton over an already scanned token sequence.
    pub fn parse_tokens(&self, tokens: &[Token]) -> Result<ParseTree, SyntaxError> {
        let mut stack = vec![StackEntry::Expect(self.table.start_symbol())];
        let mut attributes: Vec<ParseTree> = Vec::new();
        let mut pos = 0;

        loop {
            let Some(top) = stack.pop() else {
                if let Some(token) = tokens.get(pos) {
                    return Err(SyntaxError::ExtraInput {
                        location: token.location,
                    });
                }
                return match (attributes.pop(), attributes.is_empty()) {
                    (Some(tree), true) => Ok(tree),
                    _ => Err(SyntaxError::Internal(
                        "attribute stack does not hold exactly one tree".to_string(),
                    )),
                };
            };

            match top {
                StackEntry::Reduce(arity) => {
                    if attributes.len() < arity + 1 {
                        return Err(SyntaxError::Internal(format!(
                            "reduce of arity {} with {} fragments",
                            arity,
                            attributes.len()
                        )));
                    }
                    let children = attributes.split_off(attributes.len() - arity);
                    match attributes.last_mut() {
                        Some(ParseTree::Node(name, placeholder)) if placeholder.is_empty() => {
                            trace!(nonterminal = %name, arity, "reduce");
                            *placeholder = children;
                        }
                        other => {
                            let found = other.map(|tree| tree.shape());
                            return Err(SyntaxError::Internal(format!(
                                "expected placeholder below reduced fragments, found {:?}",
                                found
                            )));
                        }
                    }
                }

                StackEntry::Expect(symbol) if self.table.is_nonterminal(symbol) => {
                    let (terminal, saw, location) = lookahead(tokens, pos);
                    let Some(rhs) = self.table.lookup(symbol, terminal) else {
                        return Err(SyntaxError::NoPrediction {
                            nonterminal: symbol.to_string(),
                            saw,
                            location,
                        });
                    };
                    trace!(nonterminal = symbol, lookahead = terminal, ?rhs, "predict");

                    stack.push(StackEntry::Reduce(rhs.len()));
                    stack.extend(rhs.iter().rev().map(|s| StackEntry::Expect(s.as_str())));
                    attributes.push(ParseTree::Node(symbol.to_string(), Vec::new()));
                }

                StackEntry::Expect(symbol) => match tokens.get(pos) {
                    Some(token) if token.terminal() == symbol => {
                        trace!(terminal = symbol, lexeme = %token.lexeme, "match");
                        attributes.push(leaf(token));
                        pos += 1;
                    }
                    _ => {
                        let (_, saw, location) = lookahead(tokens, pos);
                        return Err(SyntaxError::Expected {
                            expected: symbol.to_string(),
                            saw,
                            location,
                        });
                    }
                },
            }
        }
    }
}

/// Terminal, display text and location of the token at `pos`. Past the end
/// of the token sequence there is no terminal to match.
fn lookahead(tokens: &[Token], pos: usize) -> (&str, String, SourceLocation) {
    match tokens.get(pos) {
        Some(token) => (token.terminal(), token.to_string(), token.location),
        None => (
            "",
            "end of input".to_string(),
            tokens
                .last()
                .map(|t| t.location)
                .unwrap_or(SourceLocation::new(1, 1)),
        ),
    }
}

fn leaf(token: &Token) -> ParseTree {
    match token.kind {
        TokenKind::Identifier => ParseTree::Id(token.lexeme.clone()),
        TokenKind::Number => ParseTree::Num(token.lexeme.clone()),
        _ => ParseTree::Term(token.lexeme.clone()),
    }
}

/// Parses `source` with `table`; never fails (see [`Parser::parse`]).
pub fn parse(table: &ParseTable, source: &str) -> ParseTree {
    Parser::new(table).parse(source)
}

pub fn try_parse(table: &ParseTable, source: &str) -> Result<ParseTree, SyntaxError> {
    Parser::new(table).try_parse(source)
}
