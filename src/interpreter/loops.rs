//! Guarded loop execution (`do ... od`).
//!
//! A loop has no condition of its own: it repeats its body until a `check`
//! inside it reports [`Status::Exit`], which the loop consumes and turns
//! back into [`Status::Continue`]. A runtime error ends the loop and
//! propagates. Each new iteration is charged one step, so a configured step
//! budget also bounds loops whose body never executes a statement.

use crate::interpreter::engine::{Interpreter, State, Status};
use crate::parser::ast::{Statement, StatementId};

impl Interpreter {
    pub(crate) fn execute_loop(
        &mut self,
        body: &[Statement],
        first_id: StatementId,
        mut state: State,
    ) -> (Status, State) {
        loop {
            let (status, next) = self.exec_list(body, first_id, state);
            state = next;
            match status {
                Status::Continue => {}
                Status::Exit => return (Status::Continue, state),
                Status::Error => return (Status::Error, state),
            }

            if let Err(e) = self.tick() {
                return state.fail(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::{Interpreter, RunConfig, Status};
    use crate::parser::ast::{BinOp, Expr, Program, Statement};

    fn id(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    fn num(text: &str) -> Expr {
        Expr::Number(text.to_string())
    }

    fn countdown(inner: Vec<Statement>) -> Program {
        // read n do check n > 0 <inner> n := n - 1 od
        let mut body = vec![Statement::Check(Expr::binary(BinOp::Gt, id("n"), num("0")))];
        body.extend(inner);
        body.push(Statement::Assign {
            name: "n".into(),
            expr: Expr::binary(BinOp::Sub, id("n"), num("1")),
        });
        Program::new(vec![Statement::Read("n".into()), Statement::Loop(body)])
    }

    #[test]
    fn test_check_exits_only_the_loop() {
        let mut program = countdown(vec![Statement::Write(id("n"))]);
        program.statements.push(Statement::Write(num("0")));
        let run = Interpreter::new(RunConfig::default()).run(&program, "3");
        assert_eq!(run.status, Status::Continue);
        assert_eq!(run.state.output, vec!["3", "2", "1", "0"]);
    }

    #[test]
    fn test_check_inside_if_exits_enclosing_loop() {
        let program = Program::new(vec![
            Statement::Assign {
                name: "i".into(),
                expr: num("0"),
            },
            Statement::Loop(vec![
                Statement::If {
                    condition: Expr::binary(BinOp::Eq, id("i"), num("2")),
                    body: vec![Statement::Check(num("0"))],
                },
                Statement::Write(id("i")),
                Statement::Assign {
                    name: "i".into(),
                    expr: Expr::binary(BinOp::Add, id("i"), num("1")),
                },
            ]),
        ]);
        let run = Interpreter::new(RunConfig::default()).run(&program, "");
        assert_eq!(run.render(), "0 1\nwarning: unused variables:\n");
    }

    #[test]
    fn test_error_aborts_loop() {
        let program = countdown(vec![Statement::Write(Expr::binary(
            BinOp::Div,
            num("6"),
            Expr::binary(BinOp::Sub, id("n"), num("2")),
        ))]);
        let run = Interpreter::new(RunConfig::default()).run(&program, "4");
        assert_eq!(run.status, Status::Error);
        assert_eq!(run.render(), "3 6 divide by zero\n");
    }

    #[test]
    fn test_nested_loops() {
        // outer counts n down, inner writes n copies of 1
        let inner = Statement::Loop(vec![
            Statement::Check(Expr::binary(BinOp::Lt, id("k"), id("n"))),
            Statement::Write(num("1")),
            Statement::Assign {
                name: "k".into(),
                expr: Expr::binary(BinOp::Add, id("k"), num("1")),
            },
        ]);
        let program = countdown(vec![
            Statement::Assign {
                name: "k".into(),
                expr: num("0"),
            },
            inner,
        ]);
        let run = Interpreter::new(RunConfig::default()).run(&program, "2");
        assert_eq!(run.state.output, vec!["1", "1", "1"]);
        assert!(run.succeeded());
    }
}
