//! Statement execution
//!
//! Every statement takes the current [`State`] and returns the state it
//! produced together with a [`Status`]. On failure the returned state is the
//! one the failing statement saw, plus the error message in its output.
//!
//! - `id := E` and `read id` (re)bind a variable and clear its used flag
//! - `write E` appends the decimal value to the output
//! - `if R SL fi` runs its body when the condition is nonzero
//! - `check R` signals [`Status::Exit`] when the condition is zero
//! - `do SL od` is handled in [`loops`](super::loops)

use crate::interpreter::engine::{Interpreter, State, Status};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Expr, Statement, StatementId};

impl Interpreter {
    pub(crate) fn execute(
        &mut self,
        stmt: &Statement,
        id: StatementId,
        state: State,
    ) -> (Status, State) {
        match stmt {
            Statement::Assign { name, expr } => Self::execute_assign(name, expr, state),
            Statement::Read(name) => Self::execute_read(name, state),
            Statement::Write(expr) => Self::execute_write(expr, state),
            Statement::If { condition, body } => match state.evaluate(condition) {
                (Ok(0), state) => (Status::Continue, state),
                (Ok(_), state) => self.exec_list(body, id + 1, state),
                (Err(e), state) => state.fail(e),
            },
            Statement::Loop(body) => self.execute_loop(body, id + 1, state),
            Statement::Check(condition) => match state.evaluate(condition) {
                (Ok(0), state) => (Status::Exit, state),
                (Ok(_), state) => (Status::Continue, state),
                (Err(e), state) => state.fail(e),
            },
            Statement::Error => state.fail(RuntimeError::ErroneousTree),
        }
    }

    fn execute_assign(name: &str, expr: &Expr, state: State) -> (Status, State) {
        match state.evaluate(expr) {
            (Ok(value), mut state) => {
                state.memory = std::mem::take(&mut state.memory).bind(name, value);
                (Status::Continue, state)
            }
            (Err(e), state) => state.fail(e),
        }
    }

    fn execute_read(name: &str, mut state: State) -> (Status, State) {
        let Some(word) = state.input.pop_front() else {
            return state.fail(RuntimeError::EndOfInput);
        };
        match word.parse::<i64>() {
            Ok(value) => {
                state.memory = std::mem::take(&mut state.memory).bind(name, value);
                (Status::Continue, state)
            }
            Err(_) => state.fail(RuntimeError::NonNumericInput { word }),
        }
    }

    fn execute_write(expr: &Expr, state: State) -> (Status, State) {
        match state.evaluate(expr) {
            (Ok(value), mut state) => {
                state.output.push(value.to_string());
                (Status::Continue, state)
            }
            (Err(e), state) => state.fail(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::engine::RunConfig;
    use crate::parser::ast::BinOp;

    fn exec(stmt: Statement, state: State) -> (Status, State) {
        Interpreter::new(RunConfig::default()).execute(&stmt, 0, state)
    }

    fn id(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    #[test]
    fn test_read_consumes_one_word() {
        let (status, state) = exec(Statement::Read("a".into()), State::new("12 13"));
        assert_eq!(status, Status::Continue);
        assert_eq!(state.memory.get("a"), Some(12));
        assert_eq!(state.input, vec!["13"]);
    }

    #[test]
    fn test_read_failures() {
        let (status, state) = exec(Statement::Read("a".into()), State::new(""));
        assert_eq!(status, Status::Error);
        assert_eq!(state.output, vec!["unexpected end of input"]);

        let (status, state) = exec(Statement::Read("a".into()), State::new("x1 2"));
        assert_eq!(status, Status::Error);
        assert_eq!(state.output, vec!["non-numeric input"]);
        assert!(state.memory.is_empty());
    }

    #[test]
    fn test_assign_resets_used_flag() {
        let (_, state) = exec(Statement::Read("n".into()), State::new("5"));
        let stmt = Statement::Assign {
            name: "n".into(),
            expr: Expr::binary(BinOp::Add, id("n"), Expr::Number("1".into())),
        };
        let (status, state) = exec(stmt, state);
        assert_eq!(status, Status::Continue);
        assert_eq!(state.memory.get("n"), Some(6));
        assert_eq!(state.memory.unused(), vec!["n"]);
    }

    #[test]
    fn test_failed_assign_keeps_memory() {
        let (_, state) = exec(Statement::Read("n".into()), State::new("5"));
        let stmt = Statement::Assign {
            name: "n".into(),
            expr: Expr::binary(BinOp::Div, id("n"), Expr::Number("0".into())),
        };
        let (status, state) = exec(stmt, state);
        assert_eq!(status, Status::Error);
        assert_eq!(state.memory.get("n"), Some(5));
        assert_eq!(state.output, vec!["divide by zero"]);
    }

    #[test]
    fn test_check_and_if() {
        let zero = Expr::Number("0".into());
        let (status, _) = exec(Statement::Check(zero.clone()), State::default());
        assert_eq!(status, Status::Exit);

        let stmt = Statement::If {
            condition: zero,
            body: vec![Statement::Write(id("never"))],
        };
        let (status, state) = exec(stmt, State::default());
        assert_eq!(status, Status::Continue);
        assert!(state.output.is_empty());

        let (status, state) = exec(Statement::Error, State::default());
        assert_eq!(status, Status::Error);
        assert_eq!(state.output, vec!["cannot interpret erroneous tree"]);
    }
}
