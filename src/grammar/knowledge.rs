//! Nullable / FIRST / FOLLOW computation
//!
//! The three properties are solved together by chaotic iteration: each pass
//! recomputes every nonterminal from the *current* table, so values updated
//! earlier in a pass are already visible later in the same pass. All updates
//! are monotone (`nullable` only becomes true, sets only grow), so the loop
//! reaches a fixed point over the finite terminal alphabet.
//!
//! [`KnowledgeSolver`] exposes single passes so the monotonicity can be
//! observed from tests; [`Knowledge::compute`] simply runs it to completion.

use super::sets::{union_into, TerminalSet};
use super::{Grammar, RightContext};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

/// What is known about one nonterminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolKnowledge {
    pub nullable: bool,
    pub first: TerminalSet,
    pub follow: TerminalSet,
}

impl SymbolKnowledge {
    /// True if `self` is pointwise at least as large as `earlier`.
    pub fn includes(&self, earlier: &SymbolKnowledge) -> bool {
        (self.nullable || !earlier.nullable)
            && self.first.is_superset(&earlier.first)
            && self.follow.is_superset(&earlier.follow)
    }
}

/// Solved knowledge for every nonterminal, in grammar order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Knowledge {
    entries: Vec<(String, SymbolKnowledge)>,
    passes: usize,
}

impl Knowledge {
    /// Runs the solver to its fixed point.
    pub fn compute(grammar: &Grammar) -> Knowledge {
        let mut solver = KnowledgeSolver::new(grammar);
        while solver.step() {}
        debug!(
            passes = solver.passes,
            nonterminals = grammar.rules().len(),
            "knowledge fixed point reached"
        );
        solver.into_knowledge()
    }

    pub fn get(&self, nonterminal: &str) -> Option<&SymbolKnowledge> {
        self.entries
            .iter()
            .find(|(name, _)| name == nonterminal)
            .map(|(_, k)| k)
    }

    pub fn entries(&self) -> &[(String, SymbolKnowledge)] {
        &self.entries
    }

    /// Number of full passes taken, including the final unchanged one.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// FIRST of a symbol sequence and whether the whole sequence is nullable.
    pub fn first_of(&self, grammar: &Grammar, symbols: &[String]) -> (TerminalSet, bool) {
        first_of_sequence(grammar, &self.entries, symbols)
    }
}

/// FIRST of `symbols` under the current `entries`: scan left to right,
/// stopping at the first terminal or non-nullable nonterminal.
fn first_of_sequence(
    grammar: &Grammar,
    entries: &[(String, SymbolKnowledge)],
    symbols: &[String],
) -> (TerminalSet, bool) {
    let mut first = TerminalSet::new();
    for symbol in symbols {
        match grammar.position(symbol) {
            Some(i) => {
                let k = &entries[i].1;
                first.extend(k.first.iter().cloned());
                if !k.nullable {
                    return (first, false);
                }
            }
            None => {
                first.insert(symbol.clone());
                return (first, false);
            }
        }
    }
    (first, true)
}

/// Steppable fixed-point solver.
pub struct KnowledgeSolver<'g> {
    grammar: &'g Grammar,
    contexts: FxHashMap<String, Vec<RightContext>>,
    entries: Vec<(String, SymbolKnowledge)>,
    passes: usize,
}

impl<'g> KnowledgeSolver<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        let entries = grammar
            .rules()
            .iter()
            .map(|r| (r.name.clone(), SymbolKnowledge::default()))
            .collect();

        KnowledgeSolver {
            grammar,
            contexts: grammar.right_contexts(),
            entries,
            passes: 0,
        }
    }

    /// Current (possibly partial) knowledge, in grammar order.
    pub fn entries(&self) -> &[(String, SymbolKnowledge)] {
        &self.entries
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Performs one full pass. Returns `true` if anything changed.
    pub fn step(&mut self) -> bool {
        self.passes += 1;
        let grammar = self.grammar;
        let mut changed = false;

        for (i, rule) in grammar.rules().iter().enumerate() {
            if !self.entries[i].1.nullable {
                let nullable = rule
                    .alternatives
                    .iter()
                    .any(|rhs| first_of_sequence(grammar, &self.entries, rhs).1);
                if nullable {
                    self.entries[i].1.nullable = true;
                    changed = true;
                }
            }

            for rhs in &rule.alternatives {
                let (first, _) = first_of_sequence(grammar, &self.entries, rhs);
                changed |= union_into(&mut self.entries[i].1.first, &first);
            }

            if let Some(contexts) = self.contexts.get(&rule.name) {
                for ctx in contexts {
                    let (first, nullable) =
                        first_of_sequence(grammar, &self.entries, &ctx.trailer);
                    changed |= union_into(&mut self.entries[i].1.follow, &first);
                    if nullable {
                        // lhs is always declared: it was taken from a rule
                        if let Some(j) = grammar.position(&ctx.lhs) {
                            let outer = self.entries[j].1.follow.clone();
                            changed |= union_into(&mut self.entries[i].1.follow, &outer);
                        }
                    }
                }
            }
        }

        changed
    }

    pub fn into_knowledge(self) -> Knowledge {
        Knowledge {
            entries: self.entries,
            passes: self.passes,
        }
    }
}
