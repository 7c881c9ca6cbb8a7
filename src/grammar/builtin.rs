//! Grammars shipped with the crate.
//!
//! Both are stored as JSON under `grammars/` and embedded at compile time, so
//! the same files double as samples for `--grammar <path>`.

use super::Grammar;

const CALCULATOR: &str = include_str!("../../grammars/calculator.json");
const EXTENDED: &str = include_str!("../../grammars/extended.json");

// The embedded JSON is fixed at compile time and checked by
// `test_builtins_load`, so loading it cannot fail at run time.

/// Assignment, `read` and `write` over `+ - * /` expressions.
pub fn calculator() -> Grammar {
    Grammar::from_json(CALCULATOR).expect("embedded calculator grammar is valid")
}

/// The calculator grammar plus `if R SL fi`, `do SL od`, `check R` and the
/// relational operators.
pub fn extended_calculator() -> Grammar {
    Grammar::from_json(EXTENDED).expect("embedded extended grammar is valid")
}

/// Resolves a built-in grammar by name.
pub fn by_name(name: &str) -> Option<Grammar> {
    match name {
        "calculator" | "calc" => Some(calculator()),
        "extended" | "ecg" => Some(extended_calculator()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_load() {
        let cg = calculator();
        assert_eq!(cg.start_symbol(), "P");
        assert!(!cg.terminals().contains(&"if".to_string()));

        let ecg = extended_calculator();
        assert_eq!(ecg.rules().len(), 13);
        for t in ["$$", ":=", "check", "do", "fi", "id", "num", "od", "<>"] {
            assert!(ecg.terminals().contains(&t.to_string()), "missing {}", t);
        }
    }

    #[test]
    fn test_by_name() {
        assert!(by_name("extended").is_some());
        assert!(by_name("calc").is_some());
        assert!(by_name("pascal").is_none());
    }
}
