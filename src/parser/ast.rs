// AST (Abstract Syntax Tree) definitions for the calculator language

use serde::Serialize;
use std::fmt;

/// Unique identifier for statements: pre-order position in the program
pub type StatementId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "==" => BinOp::Eq,
            "<>" => BinOp::Ne,
            "<" => BinOp::Lt,
            ">" => BinOp::Gt,
            "<=" => BinOp::Le,
            ">=" => BinOp::Ge,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "<>",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinOp::Mul | BinOp::Div => 3,
            BinOp::Add | BinOp::Sub => 2,
            _ => 1,
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ident(String),
    /// Literal text as scanned; converted to an integer at evaluation time
    Number(String),
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, outer: u8) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Number(text) => write!(f, "{}", text),
            Expr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                if prec < outer {
                    write!(f, "(")?;
                }
                lhs.fmt_prec(f, prec)?;
                write!(f, " {} ", op.symbol())?;
                // Left-associative: a right operand of equal precedence needs parens
                rhs.fmt_prec(f, prec + 1)?;
                if prec < outer {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

// Long operator chains lower to left-deep trees; drop them without recursing.
impl Drop for Expr {
    fn drop(&mut self) {
        let Expr::Binary { lhs, rhs, .. } = self else {
            return;
        };
        let mut pending = vec![detach(lhs), detach(rhs)];
        while let Some(mut expr) = pending.pop() {
            if let Expr::Binary { lhs, rhs, .. } = &mut expr {
                pending.push(detach(lhs));
                pending.push(detach(rhs));
            }
        }
    }
}

/// Takes the operand out of `slot`, leaving an empty literal behind.
fn detach(slot: &mut Expr) -> Expr {
    std::mem::replace(slot, Expr::Number(String::new()))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Statement {
    Assign { name: String, expr: Expr },
    Read(String),
    Write(Expr),
    If { condition: Expr, body: Vec<Statement> },
    /// `do ... od`: repeats until a `check` in the body fails
    Loop(Vec<Statement>),
    Check(Expr),
    /// Stands in for a program that failed to parse
    Error,
}

impl Statement {
    /// Number of statements in this subtree, itself included.
    pub fn size(&self) -> usize {
        match self {
            Statement::If { body, .. } | Statement::Loop(body) => {
                1 + body.iter().map(Statement::size).sum::<usize>()
            }
            _ => 1,
        }
    }

    /// Single-line header shown for this statement in listings.
    pub fn header(&self) -> String {
        match self {
            Statement::Assign { name, expr } => format!("{} := {}", name, expr),
            Statement::Read(name) => format!("read {}", name),
            Statement::Write(expr) => format!("write {}", expr),
            Statement::If { condition, .. } => format!("if {}", condition),
            Statement::Loop(_) => "do".to_string(),
            Statement::Check(expr) => format!("check {}", expr),
            Statement::Error => "<error>".to_string(),
        }
    }
}

/// One printed line of a program listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    pub text: String,
    pub depth: usize,
    /// Statement that starts on this line; `None` for closing `fi`/`od`
    pub statement: Option<StatementId>,
}

/// A whole program: the top-level statement list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Program { statements }
    }

    /// Total number of statements, nested ones included.
    pub fn statement_count(&self) -> usize {
        self.statements.iter().map(Statement::size).sum()
    }

    /// One line per statement header plus closing keywords, with statement
    /// ids assigned in pre-order.
    pub fn listing(&self) -> Vec<ListingLine> {
        let mut lines = Vec::new();
        let mut next_id = 0;
        listing_into(&self.statements, 0, &mut next_id, &mut lines);
        lines
    }
}

fn listing_into(
    statements: &[Statement],
    depth: usize,
    next_id: &mut StatementId,
    lines: &mut Vec<ListingLine>,
) {
    for stmt in statements {
        lines.push(ListingLine {
            text: stmt.header(),
            depth,
            statement: Some(*next_id),
        });
        *next_id += 1;

        let closing = match stmt {
            Statement::If { body, .. } => {
                listing_into(body, depth + 1, next_id, lines);
                "fi"
            }
            Statement::Loop(body) => {
                listing_into(body, depth + 1, next_id, lines);
                "od"
            }
            _ => continue,
        };
        lines.push(ListingLine {
            text: closing.to_string(),
            depth,
            statement: None,
        });
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.listing() {
            writeln!(f, "{}{}", "   ".repeat(line.depth), line.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    #[test]
    fn test_expr_display_parenthesizes() {
        let left = Expr::binary(BinOp::Sub, Expr::binary(BinOp::Sub, id("a"), id("b")), id("c"));
        assert_eq!(left.to_string(), "a - b - c");

        let right = Expr::binary(BinOp::Sub, id("a"), Expr::binary(BinOp::Sub, id("b"), id("c")));
        assert_eq!(right.to_string(), "a - (b - c)");

        let mixed = Expr::binary(BinOp::Mul, Expr::binary(BinOp::Add, id("a"), id("b")), id("c"));
        assert_eq!(mixed.to_string(), "(a + b) * c");
    }

    #[test]
    fn test_deep_expr_drops() {
        let mut expr = id("x");
        for _ in 0..200_000 {
            expr = Expr::binary(BinOp::Add, expr, Expr::Number("1".into()));
        }
        let Expr::Binary { rhs, .. } = &expr else {
            panic!("expected binary");
        };
        assert_eq!(**rhs, Expr::Number("1".into()));
        drop(expr);
    }

    #[test]
    fn test_listing_ids_are_preorder() {
        let program = Program::new(vec![
            Statement::Read("n".into()),
            Statement::Loop(vec![
                Statement::Check(Expr::binary(BinOp::Gt, id("n"), Expr::Number("0".into()))),
                Statement::If {
                    condition: id("n"),
                    body: vec![Statement::Write(id("n"))],
                },
            ]),
            Statement::Write(Expr::Number("1".into())),
        ]);

        assert_eq!(program.statement_count(), 6);
        let ids: Vec<Option<usize>> = program.listing().iter().map(|l| l.statement).collect();
        assert_eq!(
            ids,
            vec![Some(0), Some(1), Some(2), Some(3), Some(4), None, None, Some(5)]
        );
        assert_eq!(
            program.to_string(),
            "read n\ndo\n   check n > 0\n   if n\n      write n\n   fi\nod\nwrite 1\n"
        );
    }
}
