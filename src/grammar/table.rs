//! LL(1) prediction table
//!
//! Each alternative `A → α` gets the predict set
//! `FIRST(α) ∪ (FOLLOW(A) if α is nullable)`. Rows keep grammar order and
//! lookup returns the first row whose predict set contains the lookahead, so
//! overlapping predict sets are resolved in favour of the earlier
//! alternative. Overlaps are still collected by [`ParseTable::conflicts`] and
//! logged when the table is built; [`ParseTable::build_strict`] refuses them.

use super::knowledge::Knowledge;
use super::sets::TerminalSet;
use super::Grammar;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// One alternative of a nonterminal with the terminals that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub predict: TerminalSet,
    pub rhs: Vec<String>,
}

/// Two alternatives of `nonterminal` both predicted by `terminal`.
/// `chosen` wins at lookup time and `shadowed` is never selected for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub nonterminal: String,
    pub terminal: String,
    pub chosen: usize,
    pub shadowed: usize,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on '{}': alternative {} shadows alternative {}",
            self.nonterminal, self.terminal, self.chosen, self.shadowed
        )
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("grammar is not LL(1): {}", join_conflicts(.0))]
    Conflict(Vec<Conflict>),
}

fn join_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(Conflict::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The prediction table. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct ParseTable {
    start: String,
    order: Vec<String>,
    rows: FxHashMap<String, Vec<Prediction>>,
}

impl ParseTable {
    /// Computes knowledge for `grammar` and builds the table from it.
    pub fn from_grammar(grammar: &Grammar) -> ParseTable {
        let knowledge = Knowledge::compute(grammar);
        Self::build(grammar, &knowledge)
    }

    /// Builds the table, resolving conflicts by declaration order.
    pub fn build(grammar: &Grammar, knowledge: &Knowledge) -> ParseTable {
        let mut rows = FxHashMap::default();
        let mut order = Vec::with_capacity(grammar.rules().len());

        for rule in grammar.rules() {
            let follow = knowledge
                .get(&rule.name)
                .map(|k| k.follow.clone())
                .unwrap_or_default();

            let predictions = rule
                .alternatives
                .iter()
                .map(|rhs| {
                    let (mut predict, nullable) = knowledge.first_of(grammar, rhs);
                    if nullable {
                        predict.extend(follow.iter().cloned());
                    }
                    Prediction {
                        predict,
                        rhs: rhs.clone(),
                    }
                })
                .collect();

            order.push(rule.name.clone());
            rows.insert(rule.name.clone(), predictions);
        }

        let table = ParseTable {
            start: grammar.start_symbol().to_string(),
            order,
            rows,
        };

        let conflicts = table.conflicts();
        for conflict in &conflicts {
            warn!(%conflict, "predict sets overlap; earlier alternative wins");
        }
        debug!(
            nonterminals = table.order.len(),
            conflicts = conflicts.len(),
            "parse table built"
        );

        table
    }

    /// Like [`ParseTable::from_grammar`], but fails if any predict sets of
    /// sibling alternatives overlap.
    pub fn build_strict(grammar: &Grammar) -> Result<ParseTable, TableError> {
        let table = Self::from_grammar(grammar);
        let conflicts = table.conflicts();
        if conflicts.is_empty() {
            Ok(table)
        } else {
            Err(TableError::Conflict(conflicts))
        }
    }

    pub fn start_symbol(&self) -> &str {
        &self.start
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.rows.contains_key(symbol)
    }

    /// Right-hand side to expand `nonterminal` with when `terminal` is next.
    pub fn lookup(&self, nonterminal: &str, terminal: &str) -> Option<&[String]> {
        self.rows
            .get(nonterminal)?
            .iter()
            .find(|p| p.predict.contains(terminal))
            .map(|p| p.rhs.as_slice())
    }

    /// Rows of `nonterminal` in grammar order.
    pub fn predictions(&self, nonterminal: &str) -> Option<&[Prediction]> {
        self.rows.get(nonterminal).map(Vec::as_slice)
    }

    /// Nonterminals in grammar order.
    pub fn nonterminals(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Every (nonterminal, terminal) pair predicted by more than one row.
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut out = Vec::new();
        for nt in &self.order {
            let rows = &self.rows[nt];
            for (i, earlier) in rows.iter().enumerate() {
                for (j, later) in rows.iter().enumerate().skip(i + 1) {
                    for terminal in earlier.predict.intersection(&later.predict) {
                        // Report each shadowed row once per terminal
                        if rows[..i].iter().any(|p| p.predict.contains(terminal)) {
                            continue;
                        }
                        out.push(Conflict {
                            nonterminal: nt.clone(),
                            terminal: terminal.clone(),
                            chosen: i,
                            shadowed: j,
                        });
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for ParseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for nt in &self.order {
            for p in &self.rows[nt] {
                let predict: Vec<&str> = p.predict.iter().map(String::as_str).collect();
                let rhs = if p.rhs.is_empty() {
                    "ε".to_string()
                } else {
                    p.rhs.join(" ")
                };
                writeln!(f, "{:<4} → {:<16} {{{}}}", nt, rhs, predict.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{builtin, Rule};

    #[test]
    fn test_extended_lookup() {
        let table = ParseTable::from_grammar(&builtin::extended_calculator());

        assert_eq!(table.start_symbol(), "P");
        assert_eq!(table.lookup("SL", "read").unwrap(), &["S", "SL"]);
        assert!(table.lookup("SL", "$$").unwrap().is_empty());
        assert!(table.lookup("SL", "od").unwrap().is_empty());
        assert_eq!(table.lookup("S", "check").unwrap(), &["check", "R"]);
        assert_eq!(table.lookup("F", "(").unwrap(), &["(", "E", ")"]);
        assert!(table.lookup("TT", "write").unwrap().is_empty());
        assert!(table.lookup("S", "+").is_none());
        assert!(table.lookup("nope", "id").is_none());
    }

    #[test]
    fn test_builtins_are_ll1() {
        assert!(ParseTable::from_grammar(&builtin::calculator())
            .conflicts()
            .is_empty());
        assert!(ParseTable::build_strict(&builtin::extended_calculator()).is_ok());
    }

    #[test]
    fn test_conflicts_resolved_by_order() {
        // S -> a b | a c : both alternatives predicted by 'a'
        let g = Grammar::new(vec![Rule::new("S", &[&["a", "b"], &["a", "c"]])]).unwrap();
        let table = ParseTable::from_grammar(&g);

        assert_eq!(table.lookup("S", "a").unwrap(), &["a", "b"]);
        assert_eq!(
            table.conflicts(),
            vec![Conflict {
                nonterminal: "S".into(),
                terminal: "a".into(),
                chosen: 0,
                shadowed: 1,
            }]
        );

        let err = ParseTable::build_strict(&g).unwrap_err();
        assert!(err.to_string().contains("S on 'a'"));
    }

    #[test]
    fn test_nullable_alternative_uses_follow() {
        // S -> A x ; A -> y | ε
        let g = Grammar::new(vec![
            Rule::new("S", &[&["A", "x"]]),
            Rule::new("A", &[&["y"], &[]]),
        ])
        .unwrap();
        let table = ParseTable::from_grammar(&g);
        let rows = table.predictions("A").unwrap();
        assert!(rows[1].predict.contains("x"));
        assert!(!rows[1].predict.contains("y"));
    }
}
