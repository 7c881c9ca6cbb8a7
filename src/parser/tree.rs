//! Concrete parse trees produced by the table-driven parser.

use serde::Serialize;
use std::fmt;

/// A concrete parse tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParseTree {
    /// The whole result of a failed parse
    Error,
    Id(String),
    Num(String),
    /// Keyword, punctuation or end marker
    Term(String),
    Node(String, Vec<ParseTree>),
}

impl ParseTree {
    pub fn is_error(&self) -> bool {
        matches!(self, ParseTree::Error)
    }

    /// Short label: the nonterminal name or the leaf text.
    pub fn label(&self) -> &str {
        match self {
            ParseTree::Error => "<error>",
            ParseTree::Id(s) | ParseTree::Num(s) | ParseTree::Term(s) => s,
            ParseTree::Node(name, _) => name,
        }
    }

    /// The node label followed by its children's labels, e.g. `S(read id)`.
    pub fn shape(&self) -> String {
        match self {
            ParseTree::Node(name, children) => {
                let labels: Vec<&str> = children.iter().map(ParseTree::label).collect();
                format!("{}({})", name, labels.join(" "))
            }
            ParseTree::Id(name) => format!("id {}", name),
            ParseTree::Num(text) => format!("num {}", text),
            other => other.label().to_string(),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            ParseTree::Node(name, children) => {
                writeln!(f, "{}{}", indent, name)?;
                for child in children {
                    child.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
            ParseTree::Id(name) => writeln!(f, "{}id \"{}\"", indent, name),
            ParseTree::Num(text) => writeln!(f, "{}num \"{}\"", indent, text),
            ParseTree::Term(text) => writeln!(f, "{}\"{}\"", indent, text),
            ParseTree::Error => writeln!(f, "{}<error>", indent),
        }
    }
}

// Statement lists and operator tails nest once per item, so a long program
// is a deep tree. Children are detached onto a worklist before they drop.
impl Drop for ParseTree {
    fn drop(&mut self) {
        let ParseTree::Node(_, children) = self else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut tree) = pending.pop() {
            if let ParseTree::Node(_, children) = &mut tree {
                pending.append(children);
            }
        }
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
