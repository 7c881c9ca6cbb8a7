// Integration tests for the parse → lower → interpret pipeline

use llcalc::grammar::builtin;
use llcalc::grammar::table::ParseTable;
use llcalc::interpreter::{Interpreter, RunConfig, Status};
use llcalc::parser::ast::Program;
use llcalc::parser::ParseTree;
use llcalc::{compile, interpret, lower, parse};
use std::fs;

const SUM: &str = "read a read b sum := a + b write sum write sum / 2";
const ALL_USED: &str = "warning: unused variables:\n";

fn ecg() -> ParseTable {
    ParseTable::from_grammar(&builtin::extended_calculator())
}

fn program(source: &str) -> Program {
    compile(&ecg(), source).expect("compile failed")
}

fn run(source: &str, input: &str) -> String {
    interpret(&program(source), input)
}

#[test]
fn test_sum_and_average() {
    assert_eq!(run(SUM, "4 6"), format!("10 5\n{}", ALL_USED));
}

#[test]
fn test_primes() {
    let source = fs::read_to_string("demos/primes.calc").expect("Failed to read demo file");
    let output = run(&source, "10");
    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("2 3 5 7 11 13 17 19 23 29"));
    // cp is rebound right before the final check
    assert_eq!(lines.next(), Some("warning: unused variables: cp"));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_non_numeric_input() {
    let output = run(SUM, "4 foo");
    assert!(output.trim_end().ends_with("non-numeric input"), "{}", output);
    assert!(!output.contains("warning"));
}

#[test]
fn test_divide_by_zero_after_output() {
    assert_eq!(run("write 3 write 2 / 0", ""), "3 divide by zero\n");
}

#[test]
fn test_use_before_declare() {
    let output = run("write foo", "");
    assert!(output.contains("variable foo use before declare"), "{}", output);
}

#[test]
fn test_unused_variable_warning() {
    assert_eq!(
        run("read a read b write a", "3 4"),
        "3\nwarning: unused variables: b\n"
    );
}

#[test]
fn test_empty_program() {
    assert_eq!(run("", ""), format!("\n{}", ALL_USED));
    assert_eq!(run("  \n ", "1 2 3"), format!("\n{}", ALL_USED));
}

#[test]
fn test_input_exhausted() {
    assert_eq!(run(SUM, "4"), "unexpected end of input\n");
}

#[test]
fn test_gcd_demo() {
    let source = fs::read_to_string("demos/gcd.calc").expect("Failed to read demo file");
    assert_eq!(run(&source, "12 18"), format!("6\n{}", ALL_USED));
    assert_eq!(run(&source, "7 7"), format!("7\n{}", ALL_USED));
}

#[test]
fn test_syntax_error_yields_error_program() {
    let tree = parse(&ecg(), "read 5");
    assert_eq!(tree, ParseTree::Error);
    let program = lower(&tree).expect("error tree lowers");
    assert_eq!(interpret(&program, ""), "cannot interpret erroneous tree\n");
}

#[test]
fn test_calculator_grammar_runs_sum() {
    let table = ParseTable::from_grammar(&builtin::calculator());
    let program = compile(&table, SUM).expect("compile failed");
    assert_eq!(interpret(&program, "1 2"), format!("3 1\n{}", ALL_USED));
    assert!(compile(&table, "if a write a fi").is_err());
}

#[test]
fn test_snapshot_history_follows_execution() {
    let source = "read n do check n > 0 write n n := n - 1 od";
    let run = Interpreter::new(RunConfig::with_history()).run(&program(source), "2");
    assert_eq!(run.render(), format!("2 1\n{}", ALL_USED));

    // read, 2 × (check, write, assign), final check, loop, plus the initial state
    let history = run.history.expect("history recorded");
    assert_eq!(history.len(), 1 + 1 + 2 * 3 + 1 + 1);
    assert!(!history.is_truncated());

    let last = history.get(history.len() - 1).unwrap();
    assert_eq!(last.statement, Some(1));
    assert_eq!(last.status, Status::Continue);
    assert_eq!(last.state.memory.get("n"), Some(0));
    // the failing check is recorded with the exit it signalled
    assert_eq!(history.get(history.len() - 2).unwrap().status, Status::Exit);
}

#[test]
fn test_step_limit() {
    let config = RunConfig {
        snapshot_limit: None,
        max_steps: Some(1000),
    };
    let run = Interpreter::new(config).run(&program("x := 0 do x := x + 1 od"), "");
    assert_eq!(run.status, Status::Error);
    assert_eq!(run.render(), "step limit exceeded\n");
}

#[test]
fn test_pretty_print_round_trips_through_parser() {
    let source = fs::read_to_string("demos/primes.calc").expect("Failed to read demo file");
    let first = program(&source);
    let printed = first.to_string();
    assert_eq!(program(&printed), first);
}

#[test]
fn test_long_program() {
    let source = "write 1 ".repeat(50_000);
    let output = run(&source, "");
    let mut lines = output.lines();
    let words = lines.next().expect("output line");
    assert_eq!(words.split(' ').count(), 50_000);
    assert_eq!(lines.next(), Some("warning: unused variables:"));
}

#[test]
fn test_long_expression() {
    let source = format!("read x write x{}", " + 1".repeat(20_000));
    assert_eq!(run(&source, "5"), format!("20005\n{}", ALL_USED));
}
