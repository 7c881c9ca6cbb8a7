//! Lowering of concrete parse trees to the AST
//!
//! One case per shape produced by the calculator grammars:
//!
//! ```text
//! P  → SL $$              SL → S SL | ε
//! S  → id := E | read id | write E | if R SL fi | do SL od | check R
//! R  → E ET               ET → ro E | ε
//! E  → T TT               TT → ao T TT | ε
//! T  → F FT               FT → mo F FT | ε
//! F  → id | num | ( E )
//! ```
//!
//! Keywords and parentheses are dropped, statement lists are flattened, and
//! the right-recursive `TT`/`FT` tails are folded into left-associative
//! [`Expr::Binary`] chains. Any other shape means the grammar and this module
//! disagree, which is reported as a [`LowerError`].

use super::ast::{BinOp, Expr, Program, Statement};
use super::tree::ParseTree;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("malformed parse tree: expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: String,
    },
}

fn unexpected(expected: &'static str, found: &ParseTree) -> LowerError {
    LowerError::UnexpectedShape {
        expected,
        found: found.shape(),
    }
}

/// Lowers a whole parse. The error tree becomes a one-statement program
/// holding [`Statement::Error`].
pub fn lower(tree: &ParseTree) -> Result<Program, LowerError> {
    match tree {
        ParseTree::Error => Ok(Program::new(vec![Statement::Error])),
        ParseTree::Node(name, children) if name == "P" => match children.as_slice() {
            [list, ParseTree::Term(_)] => Ok(Program::new(lower_list(list)?)),
            _ => Err(unexpected("P → SL $$", tree)),
        },
        other => Err(unexpected("P", other)),
    }
}

fn lower_list(tree: &ParseTree) -> Result<Vec<Statement>, LowerError> {
    let mut statements = Vec::new();
    let mut current = tree;
    loop {
        match current {
            ParseTree::Node(name, children) if name == "SL" => match children.as_slice() {
                [] => return Ok(statements),
                [stmt, rest] => {
                    statements.push(lower_statement(stmt)?);
                    current = rest;
                }
                _ => return Err(unexpected("SL → S SL | ε", current)),
            },
            other => return Err(unexpected("SL", other)),
        }
    }
}

fn lower_statement(tree: &ParseTree) -> Result<Statement, LowerError> {
    let ParseTree::Node(name, children) = tree else {
        return Err(unexpected("S", tree));
    };
    if name != "S" {
        return Err(unexpected("S", tree));
    }

    use ParseTree::{Id, Term};
    match children.as_slice() {
        [Id(target), Term(_), expr] => Ok(Statement::Assign {
            name: target.clone(),
            expr: lower_expr(expr)?,
        }),
        [Term(kw), Id(target)] if kw == "read" => Ok(Statement::Read(target.clone())),
        [Term(kw), expr] if kw == "write" => Ok(Statement::Write(lower_expr(expr)?)),
        [Term(kw), cond] if kw == "check" => Ok(Statement::Check(lower_condition(cond)?)),
        [Term(kw), cond, body, Term(_)] if kw == "if" => Ok(Statement::If {
            condition: lower_condition(cond)?,
            body: lower_list(body)?,
        }),
        [Term(kw), body, Term(_)] if kw == "do" => Ok(Statement::Loop(lower_list(body)?)),
        _ => Err(unexpected("a statement", tree)),
    }
}

/// `R → E ET`: a plain expression, or a single comparison.
fn lower_condition(tree: &ParseTree) -> Result<Expr, LowerError> {
    match tree {
        ParseTree::Node(name, children) if name == "R" => match children.as_slice() {
            [lhs, ParseTree::Node(tail, rest)] if tail == "ET" => {
                let lhs = lower_expr(lhs)?;
                match rest.as_slice() {
                    [] => Ok(lhs),
                    [op, rhs] => Ok(Expr::binary(lower_op(op)?, lhs, lower_expr(rhs)?)),
                    _ => Err(unexpected("ET → ro E | ε", &children[1])),
                }
            }
            _ => Err(unexpected("R → E ET", tree)),
        },
        // Grammars without relational operators use a bare expression
        _ => lower_expr(tree),
    }
}

fn lower_expr(tree: &ParseTree) -> Result<Expr, LowerError> {
    match tree {
        ParseTree::Node(name, children) if name == "E" => match children.as_slice() {
            [term, tail] => fold_tail(lower_term(term)?, tail, "TT", lower_term),
            _ => Err(unexpected("E → T TT", tree)),
        },
        other => Err(unexpected("E", other)),
    }
}

fn lower_term(tree: &ParseTree) -> Result<Expr, LowerError> {
    match tree {
        ParseTree::Node(name, children) if name == "T" => match children.as_slice() {
            [factor, tail] => fold_tail(lower_factor(factor)?, tail, "FT", lower_factor),
            _ => Err(unexpected("T → F FT", tree)),
        },
        other => Err(unexpected("T", other)),
    }
}

fn lower_factor(tree: &ParseTree) -> Result<Expr, LowerError> {
    match tree {
        ParseTree::Node(name, children) if name == "F" => match children.as_slice() {
            [ParseTree::Id(id)] => Ok(Expr::Ident(id.clone())),
            [ParseTree::Num(text)] => Ok(Expr::Number(text.clone())),
            [ParseTree::Term(_), inner, ParseTree::Term(_)] => lower_expr(inner),
            _ => Err(unexpected("F → id | num | ( E )", tree)),
        },
        other => Err(unexpected("F", other)),
    }
}

/// Folds `tail → op operand tail | ε` onto `lhs`, left to right.
fn fold_tail(
    mut lhs: Expr,
    tail: &ParseTree,
    tail_name: &'static str,
    operand: fn(&ParseTree) -> Result<Expr, LowerError>,
) -> Result<Expr, LowerError> {
    let mut current = tail;
    loop {
        match current {
            ParseTree::Node(name, children) if name == tail_name => match children.as_slice() {
                [] => return Ok(lhs),
                [op, rhs, rest] => {
                    lhs = Expr::binary(lower_op(op)?, lhs, operand(rhs)?);
                    current = rest;
                }
                _ => return Err(unexpected("operator tail", current)),
            },
            other => return Err(unexpected(tail_name, other)),
        }
    }
}

/// `ao`, `mo` or `ro` wrapping a single operator terminal.
fn lower_op(tree: &ParseTree) -> Result<BinOp, LowerError> {
    match tree {
        ParseTree::Node(_, children) => match children.as_slice() {
            [ParseTree::Term(symbol)] => {
                BinOp::from_symbol(symbol).ok_or_else(|| unexpected("an operator", tree))
            }
            _ => Err(unexpected("an operator", tree)),
        },
        other => Err(unexpected("an operator", other)),
    }
}
