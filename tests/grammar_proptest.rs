//! Property-based tests for the table generator and the front end
//!
//! - knowledge passes only ever grow, and the solver reaches a fixed point
//! - the scanner accepts any input and always ends with one end marker
//! - the parser returns a tree or a syntax error, never panics

use llcalc::grammar::builtin;
use llcalc::grammar::knowledge::{Knowledge, KnowledgeSolver};
use llcalc::grammar::table::ParseTable;
use llcalc::grammar::{Grammar, Rule};
use llcalc::parser::lexer::{tokenize, TokenKind};
use llcalc::try_parse;
use proptest::prelude::*;

const NONTERMINALS: [&str; 4] = ["A", "B", "C", "D"];
const SYMBOLS: [&str; 7] = ["A", "B", "C", "D", "x", "y", "z"];

/// Generate grammars over four nonterminals and three terminals, including
/// empty alternatives and left recursion
fn grammar_strategy() -> impl Strategy<Value = Grammar> {
    let alternative = prop::collection::vec(prop::sample::select(SYMBOLS.to_vec()), 0..4);
    let rule = prop::collection::vec(alternative, 1..4);
    prop::collection::vec(rule, NONTERMINALS.len()).prop_map(|rules| {
        let rules = NONTERMINALS
            .iter()
            .zip(rules)
            .map(|(name, alternatives)| Rule {
                name: name.to_string(),
                alternatives: alternatives
                    .into_iter()
                    .map(|alt| alt.into_iter().map(str::to_string).collect())
                    .collect(),
            })
            .collect();
        Grammar::new(rules).expect("generated grammar is valid")
    })
}

/// Generate source text mixing calculator tokens with arbitrary characters
fn source_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::sample::select(vec![
                "read", "write", "if", "fi", "do", "od", "check", ":=", "+", "-", "*", "/",
                "(", ")", "==", "<>", "<", ">", "<=", ">=",
            ])
            .prop_map(str::to_string),
            "[a-z][a-z0-9_]{0,5}",
            "[0-9]{1,4}(\\.[0-9]{1,2})?",
            "[ \\t\\n]{1,3}",
            ".",
        ],
        0..40,
    )
    .prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn test_knowledge_is_monotone(grammar in grammar_strategy()) {
        let mut solver = KnowledgeSolver::new(&grammar);
        let mut previous = solver.entries().to_vec();
        // 4 nonterminals and 4 terminals bound the number of growing passes
        for _ in 0..64 {
            let changed = solver.step();
            let current = solver.entries().to_vec();
            for ((nt, before), (_, after)) in previous.iter().zip(&current) {
                prop_assert!(after.includes(before), "{} shrank", nt);
            }
            if !changed {
                prop_assert_eq!(&previous, &current);
                break;
            }
            previous = current;
        }
        prop_assert!(!solver.step(), "no fixed point after 64 passes");
    }

    #[test]
    fn test_compute_matches_stepping(grammar in grammar_strategy()) {
        let mut solver = KnowledgeSolver::new(&grammar);
        while solver.step() {}
        let stepped = solver.into_knowledge();
        let computed = Knowledge::compute(&grammar);
        prop_assert_eq!(stepped.entries(), computed.entries());
    }

    #[test]
    fn test_table_rows_match_alternatives(grammar in grammar_strategy()) {
        let table = ParseTable::from_grammar(&grammar);
        for rule in grammar.rules() {
            let rows = table.predictions(&rule.name).expect("row per nonterminal");
            prop_assert_eq!(rows.len(), rule.alternatives.len());
        }
    }

    #[test]
    fn test_tokenize_is_total(input in "\\PC{0,80}") {
        let tokens = tokenize(&input);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::End));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::End).count(), 1);
        for token in &tokens[..tokens.len() - 1] {
            prop_assert!(!token.lexeme.is_empty());
        }
    }

    #[test]
    fn test_parse_never_panics(source in source_strategy()) {
        let table = ParseTable::from_grammar(&builtin::extended_calculator());
        // Either outcome is fine; internal errors are not
        if let Err(e) = try_parse(&table, &source) {
            prop_assert!(!matches!(e, llcalc::parser::SyntaxError::Internal(_)), "{}", e);
        }
    }
}
