//! Context-free grammar model and the LL(1) table generator
//!
//! This module turns a declarative grammar into a prediction table:
//! - [`Grammar`]: ordered nonterminal → alternatives mapping
//! - [`sets`]: sorted-unique terminal set helpers
//! - [`knowledge`]: nullable / FIRST / FOLLOW fixed point
//! - [`table`]: predict sets and first-match lookup
//! - [`builtin`]: the calculator grammars shipped with the crate
//!
//! # Symbol classification
//!
//! A symbol is a nonterminal iff it names a rule. Every other symbol that
//! appears on a right-hand side is a terminal; there is no separate terminal
//! declaration. The first rule's nonterminal is the start symbol.

pub mod builtin;
pub mod knowledge;
pub mod sets;
pub mod table;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised while building a grammar. These are construction-time
/// defects in the grammar data, never user program errors.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("grammar has no rules")]
    Empty,

    #[error("nonterminal '{0}' is declared more than once")]
    DuplicateNonterminal(String),

    #[error("rule '{0}' contains an empty symbol name")]
    EmptySymbol(String),

    #[error("invalid grammar JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One nonterminal with its ordered alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub alternatives: Vec<Vec<String>>,
}

impl Rule {
    pub fn new(name: &str, alternatives: &[&[&str]]) -> Self {
        Rule {
            name: name.to_string(),
            alternatives: alternatives
                .iter()
                .map(|rhs| rhs.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }
}

/// A right context of some nonterminal `B`: `lhs` has an alternative in
/// which `B` is immediately followed by `trailer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RightContext {
    pub lhs: String,
    pub trailer: Vec<String>,
}

/// A validated grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    index: FxHashMap<String, usize>,
    terminals: Vec<String>,
}

impl Grammar {
    /// Validates `rules` and derives the terminal alphabet.
    pub fn new(rules: Vec<Rule>) -> Result<Self, GrammarError> {
        if rules.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut index = FxHashMap::default();
        for (i, rule) in rules.iter().enumerate() {
            if index.insert(rule.name.clone(), i).is_some() {
                return Err(GrammarError::DuplicateNonterminal(rule.name.clone()));
            }
            if rule.name.is_empty() || rule.alternatives.iter().flatten().any(|s| s.is_empty()) {
                return Err(GrammarError::EmptySymbol(rule.name.clone()));
            }
        }

        let nonterminals: BTreeSet<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        let terminals = sets::difference(
            rules
                .iter()
                .flat_map(|r| r.alternatives.iter().flatten())
                .map(String::as_str),
            &nonterminals,
        );

        Ok(Grammar {
            rules,
            index,
            terminals,
        })
    }

    /// Parses a grammar from JSON: an array of `[name, [[symbol, ...], ...]]`
    /// pairs. Rule order is significant.
    pub fn from_json(text: &str) -> Result<Self, GrammarError> {
        let raw: Vec<(String, Vec<Vec<String>>)> = serde_json::from_str(text)?;
        let rules = raw
            .into_iter()
            .map(|(name, alternatives)| Rule { name, alternatives })
            .collect();
        Self::new(rules)
    }

    pub fn start_symbol(&self) -> &str {
        &self.rules[0].name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// The terminal alphabet, sorted.
    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    /// Alternatives of `nonterminal`, or `None` if it is not declared.
    pub fn alternatives(&self, nonterminal: &str) -> Option<&[Vec<String>]> {
        self.index
            .get(nonterminal)
            .map(|&i| self.rules[i].alternatives.as_slice())
    }

    /// Position of `nonterminal` in declaration order.
    pub fn position(&self, nonterminal: &str) -> Option<usize> {
        self.index.get(nonterminal).copied()
    }

    /// Right contexts of every nonterminal, keyed by nonterminal.
    ///
    /// A nonterminal occurring twice in one alternative gets one context per
    /// occurrence; duplicates across alternatives are kept once.
    pub fn right_contexts(&self) -> FxHashMap<String, Vec<RightContext>> {
        let mut contexts: FxHashMap<String, Vec<RightContext>> = FxHashMap::default();
        let mut seen: FxHashSet<(String, String, Vec<String>)> = FxHashSet::default();

        for rule in &self.rules {
            for rhs in &rule.alternatives {
                for (pos, symbol) in rhs.iter().enumerate() {
                    if !self.is_nonterminal(symbol) {
                        continue;
                    }
                    let trailer = rhs[pos + 1..].to_vec();
                    if seen.insert((symbol.clone(), rule.name.clone(), trailer.clone())) {
                        contexts
                            .entry(symbol.clone())
                            .or_default()
                            .push(RightContext {
                                lhs: rule.name.clone(),
                                trailer,
                            });
                    }
                }
            }
        }

        contexts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Grammar {
        Grammar::new(vec![
            Rule::new("E", &[&["T", "TT"]]),
            Rule::new("TT", &[&["+", "T", "TT"], &[]]),
            Rule::new("T", &[&["id"], &["(", "E", ")"]]),
        ])
        .unwrap()
    }

    #[test]
    fn test_classification() {
        let g = tiny();
        assert_eq!(g.start_symbol(), "E");
        assert!(g.is_nonterminal("TT"));
        assert!(!g.is_nonterminal("id"));
        assert_eq!(g.terminals(), &["(", ")", "+", "id"]);
        assert_eq!(g.position("T"), Some(2));
        assert_eq!(g.alternatives("TT").unwrap().len(), 2);
        assert!(g.alternatives("nope").is_none());
    }

    #[test]
    fn test_right_contexts() {
        let g = tiny();
        let ctx = g.right_contexts();

        let tt = &ctx["TT"];
        assert!(tt.contains(&RightContext {
            lhs: "E".into(),
            trailer: vec![]
        }));
        assert!(tt.contains(&RightContext {
            lhs: "TT".into(),
            trailer: vec![]
        }));

        let e = &ctx["E"];
        assert_eq!(
            e,
            &vec![RightContext {
                lhs: "T".into(),
                trailer: vec![")".into()]
            }]
        );
    }

    #[test]
    fn test_rejects_bad_grammars() {
        assert!(matches!(Grammar::new(vec![]), Err(GrammarError::Empty)));

        let dup = Grammar::new(vec![Rule::new("A", &[&["x"]]), Rule::new("A", &[&[]])]);
        assert!(matches!(dup, Err(GrammarError::DuplicateNonterminal(n)) if n == "A"));

        let empty = Grammar::new(vec![Rule::new("A", &[&[""]])]);
        assert!(matches!(empty, Err(GrammarError::EmptySymbol(_))));
    }

    #[test]
    fn test_from_json() {
        let g = Grammar::from_json(r#"[["S", [["a", "S"], []]]]"#).unwrap();
        assert_eq!(g.start_symbol(), "S");
        assert_eq!(g.terminals(), &["a"]);

        assert!(matches!(
            Grammar::from_json("{not json"),
            Err(GrammarError::Json(_))
        ));
    }
}
