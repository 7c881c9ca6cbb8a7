//! Runtime error types for the calculator interpreter
//!
//! A [`RuntimeError`] never escapes the interpreter as a Rust error: its
//! message is appended to the program output and the run status becomes
//! [`Status::Error`](super::Status::Error). The `Display` text of each variant
//! is therefore part of the observable program output.

use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Identifier read before any assignment or `read`
    #[error("variable {0} use before declare")]
    UndeclaredVariable(String),

    /// `read` with no input words left
    #[error("unexpected end of input")]
    EndOfInput,

    /// `read` of a word that is not an integer
    #[error("non-numeric input")]
    NonNumericInput { word: String },

    #[error("divide by zero")]
    DivideByZero,

    /// Result or literal outside the 64-bit signed range
    #[error("integer overflow")]
    IntegerOverflow,

    /// A scanned literal with a fractional part
    #[error("non-integer literal {0}")]
    NonIntegerLiteral(String),

    /// The program came from a failed parse
    #[error("cannot interpret erroneous tree")]
    ErroneousTree,

    #[error("step limit exceeded")]
    StepLimitExceeded { limit: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            RuntimeError::UndeclaredVariable("foo".into()).to_string(),
            "variable foo use before declare"
        );
        assert_eq!(
            RuntimeError::NonNumericInput { word: "x".into() }.to_string(),
            "non-numeric input"
        );
        assert_eq!(
            RuntimeError::NonIntegerLiteral("2.5".into()).to_string(),
            "non-integer literal 2.5"
        );
        assert_eq!(
            RuntimeError::StepLimitExceeded { limit: 10 }.to_string(),
            "step limit exceeded"
        );
    }
}
