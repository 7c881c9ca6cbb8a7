//! Expression evaluation
//!
//! Evaluation threads [`Memory`] through by value: reading an identifier
//! marks it used, so the memory that comes back differs from the one that
//! went in even though no variable changes value.
//!
//! All arithmetic uses checked `i64` math, so overflow and division by zero
//! surface as runtime errors rather than panics. Division truncates toward
//! zero. Comparisons yield 1 or 0.

use crate::interpreter::errors::RuntimeError;
use crate::memory::Memory;
use crate::parser::ast::{BinOp, Expr};

pub type Evaluated = (Result<i64, RuntimeError>, Memory);

/// Pending work while walking a binary chain
enum Frame<'a> {
    /// Left operand still being evaluated; the right one comes next
    Right { op: BinOp, rhs: &'a Expr },
    /// Right operand being evaluated; `lhs` is the left value
    Apply { op: BinOp, lhs: i64 },
}

/// Evaluates `expr` against `memory`. The left operand is evaluated first;
/// an error in either operand is the result of the whole expression.
///
/// Operator chains can be arbitrarily deep, so the walk keeps its own stack
/// of [`Frame`]s instead of recursing.
pub fn evaluate(expr: &Expr, mut memory: Memory) -> Evaluated {
    let mut frames: Vec<Frame> = Vec::new();
    let mut next = expr;

    loop {
        // Descend the left spine to a leaf
        let (result, after) = loop {
            match next {
                Expr::Binary { op, lhs, rhs } => {
                    frames.push(Frame::Right { op: *op, rhs: rhs.as_ref() });
                    next = lhs.as_ref();
                }
                Expr::Number(text) => break (parse_literal(text), memory),
                Expr::Ident(name) => {
                    let (value, memory) = memory.lookup(name);
                    let value =
                        value.ok_or_else(|| RuntimeError::UndeclaredVariable(name.clone()));
                    break (value, memory);
                }
            }
        };
        memory = after;
        let mut value = match result {
            Ok(v) => v,
            Err(e) => return (Err(e), memory),
        };

        // Unwind until a right operand is pending
        loop {
            match frames.pop() {
                None => return (Ok(value), memory),
                Some(Frame::Right { op, rhs }) => {
                    frames.push(Frame::Apply { op, lhs: value });
                    next = rhs;
                    break;
                }
                Some(Frame::Apply { op, lhs }) => match apply(op, lhs, value) {
                    Ok(v) => value = v,
                    Err(e) => return (Err(e), memory),
                },
            }
        }
    }
}

/// Applies a binary operator to two integers.
#[inline]
pub fn apply(op: BinOp, lhs: i64, rhs: i64) -> Result<i64, RuntimeError> {
    match op {
        BinOp::Add => lhs.checked_add(rhs).ok_or(RuntimeError::IntegerOverflow),
        BinOp::Sub => lhs.checked_sub(rhs).ok_or(RuntimeError::IntegerOverflow),
        BinOp::Mul => lhs.checked_mul(rhs).ok_or(RuntimeError::IntegerOverflow),
        BinOp::Div => {
            if rhs == 0 {
                return Err(RuntimeError::DivideByZero);
            }
            // i64::MIN / -1 is the only remaining failure
            lhs.checked_div(rhs).ok_or(RuntimeError::IntegerOverflow)
        }
        BinOp::Eq => Ok((lhs == rhs) as i64),
        BinOp::Ne => Ok((lhs != rhs) as i64),
        BinOp::Lt => Ok((lhs < rhs) as i64),
        BinOp::Gt => Ok((lhs > rhs) as i64),
        BinOp::Le => Ok((lhs <= rhs) as i64),
        BinOp::Ge => Ok((lhs >= rhs) as i64),
    }
}

/// Converts literal text to an integer. A digit run too long for `i64` is an
/// overflow; anything with a fractional part is rejected.
fn parse_literal(text: &str) -> Result<i64, RuntimeError> {
    text.parse::<i64>().map_err(|_| {
        if text.bytes().all(|b| b.is_ascii_digit()) {
            RuntimeError::IntegerOverflow
        } else {
            RuntimeError::NonIntegerLiteral(text.to_string())
        }
    })
}
