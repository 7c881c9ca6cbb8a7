// Execution engine for the calculator interpreter

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::expressions;
use crate::memory::Memory;
use crate::parser::ast::{Expr, Program, Statement, StatementId};
use crate::snapshot::{Snapshot, SnapshotManager};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Default snapshot history budget for the step viewer (256 MB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;

/// How a statement (or statement list) finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Continue,
    /// A runtime error; its message is already in the output
    Error,
    /// A `check` failed; consumed by the nearest enclosing loop
    Exit,
}

/// Everything a statement reads or produces, passed from step to step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct State {
    pub memory: Memory,
    /// Input words not yet consumed by `read`
    pub input: VecDeque<String>,
    pub output: Vec<String>,
}

impl State {
    /// Fresh state with `input` split on whitespace runs.
    pub fn new(input: &str) -> Self {
        State {
            memory: Memory::new(),
            input: input.split_whitespace().map(str::to_string).collect(),
            output: Vec::new(),
        }
    }

    /// Evaluates `expr` against this state's memory.
    pub(crate) fn evaluate(mut self, expr: &Expr) -> (Result<i64, RuntimeError>, State) {
        let memory = std::mem::take(&mut self.memory);
        let (value, memory) = expressions::evaluate(expr, memory);
        self.memory = memory;
        (value, self)
    }

    /// Appends the error message to the output and flags the error.
    pub(crate) fn fail(mut self, error: RuntimeError) -> (Status, State) {
        debug!(%error, "runtime error");
        self.output.push(error.to_string());
        (Status::Error, self)
    }
}

/// Run-time limits
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Byte budget for the snapshot history; `None` records nothing
    pub snapshot_limit: Option<usize>,
    /// Upper bound on executed statements plus loop iterations
    pub max_steps: Option<u64>,
}

impl RunConfig {
    /// Records history up to [`DEFAULT_SNAPSHOT_LIMIT`].
    pub fn with_history() -> Self {
        RunConfig {
            snapshot_limit: Some(DEFAULT_SNAPSHOT_LIMIT),
            max_steps: None,
        }
    }
}

/// Tree-walking interpreter. The program state is threaded through every
/// call by value; the interpreter itself only keeps the step count and the
/// snapshot history.
pub struct Interpreter {
    config: RunConfig,
    history: Option<SnapshotManager>,
    steps: u64,
}

impl Interpreter {
    pub fn new(config: RunConfig) -> Self {
        let history = config.snapshot_limit.map(SnapshotManager::new);
        Interpreter {
            config,
            history,
            steps: 0,
        }
    }

    /// Runs `program` to completion against the whitespace-separated words
    /// of `input`.
    pub fn run(mut self, program: &Program, input: &str) -> Run {
        let state = State::new(input);
        self.record(None, &state, Status::Continue);

        let (status, state) = self.exec_list(&program.statements, 0, state);
        debug!(steps = self.steps, ?status, "run finished");

        let mut history = self.history;
        if let Some(history) = history.as_mut() {
            history.rewind_to_start();
        }
        Run {
            state,
            status,
            steps: self.steps,
            history,
        }
    }

    /// Executes `statements` in order while the status stays `Continue`.
    /// `first_id` is the pre-order id of the first statement.
    pub(crate) fn exec_list(
        &mut self,
        statements: &[Statement],
        first_id: StatementId,
        mut state: State,
    ) -> (Status, State) {
        let mut id = first_id;
        for stmt in statements {
            let (status, next) = self.exec_stmt(stmt, id, state);
            state = next;
            if status != Status::Continue {
                return (status, state);
            }
            id += stmt.size();
        }
        (Status::Continue, state)
    }

    fn exec_stmt(&mut self, stmt: &Statement, id: StatementId, state: State) -> (Status, State) {
        let (status, state) = match self.tick() {
            Ok(()) => self.execute(stmt, id, state),
            Err(e) => state.fail(e),
        };
        self.record(Some(id), &state, status);
        (status, state)
    }

    /// Charges one step against the configured budget.
    pub(crate) fn tick(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;
        match self.config.max_steps {
            Some(limit) if self.steps > limit => Err(RuntimeError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn record(&mut self, statement: Option<StatementId>, state: &State, status: Status) {
        let Some(history) = self.history.as_mut() else {
            return;
        };
        if history.is_truncated() {
            return;
        }
        let snapshot = Snapshot {
            statement,
            state: state.clone(),
            status,
        };
        if let Err(e) = history.push(snapshot) {
            warn!(error = %e, recorded = history.len(), "snapshot history truncated");
        }
    }
}

/// Outcome of a whole run
#[derive(Debug)]
pub struct Run {
    pub state: State,
    /// `Exit` when a top-level `check` ended the program
    pub status: Status,
    pub steps: u64,
    pub history: Option<SnapshotManager>,
}

impl Run {
    /// Whether the program finished without a runtime error.
    pub fn succeeded(&self) -> bool {
        self.status != Status::Error
    }

    /// Variables never read, reported only for successful runs.
    pub fn unused(&self) -> Vec<&str> {
        if self.succeeded() {
            self.state.memory.unused()
        } else {
            Vec::new()
        }
    }

    /// Output words on one line. A successful run adds the unused-variable
    /// line, with an empty name list when every variable was read.
    pub fn render(&self) -> String {
        let mut text = self.state.output.join(" ");
        text.push('\n');
        if self.succeeded() {
            text.push_str("warning: unused variables:");
            for name in self.unused() {
                text.push(' ');
                text.push_str(name);
            }
            text.push('\n');
        }
        text
    }
}

/// Runs `program` on `input` without history or step limit and renders the
/// result.
pub fn interpret(program: &Program, input: &str) -> String {
    Interpreter::new(RunConfig::default())
        .run(program, input)
        .render()
}
