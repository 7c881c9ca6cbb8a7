use llcalc::grammar::builtin;
use llcalc::grammar::table::ParseTable;
use llcalc::{compile, interpret};
use rstest::rstest;

const ALL_USED: &str = "warning: unused variables:\n";

fn run(source: &str, input: &str) -> String {
    let table = ParseTable::from_grammar(&builtin::extended_calculator());
    let program = compile(&table, source).expect("compile failed");
    interpret(&program, input)
}

#[rstest]
#[case::precedence("write 2 + 3 * 4", "", "14")]
#[case::parentheses("write (2 + 3) * 4", "", "20")]
#[case::left_assoc_sub("write 10 - 4 - 3", "", "3")]
#[case::left_assoc_div("write 100 / 10 / 5", "", "2")]
#[case::truncation("write 7 / 2 write 0 - 7 / 2", "", "3 -3")]
#[case::comparisons(
    "if 1 < 2 write 1 fi if 2 <= 1 write 2 fi if 3 == 3 write 3 fi \
     if 3 <> 3 write 4 fi if 4 >= 4 write 5 fi if 5 > 6 write 6 fi",
    "",
    "1 3 5"
)]
#[case::comparison_binds_loosest("if 1 + 1 == 2 write 7 fi", "", "7")]
#[case::negative_input_word("read x write x * 2", "-21", "-42")]
fn test_arithmetic(#[case] source: &str, #[case] input: &str, #[case] expected: &str) {
    assert_eq!(run(source, input), format!("{}\n{}", expected, ALL_USED));
}

#[rstest]
#[case::overflow("write 9223372036854775807 + 1", "integer overflow")]
#[case::literal_too_large("write 99999999999999999999", "integer overflow")]
#[case::decimal_literal("write 2.5", "non-integer literal 2.5")]
#[case::divide_by_zero_in_condition("if 1 / 0 write 1 fi", "divide by zero")]
#[case::check_failure_in_condition("do check x od", "variable x use before declare")]
fn test_runtime_errors(#[case] source: &str, #[case] message: &str) {
    assert_eq!(run(source, ""), format!("{}\n", message));
}

#[rstest]
#[case::nonzero_is_true("if 5 write 1 fi", "1")]
#[case::zero_is_false("if 0 write 1 fi write 2", "2")]
#[case::top_level_check_ends_program("write 1 check 0 write 2", "1")]
#[case::top_level_check_passes("write 1 check 1 write 2", "1 2")]
fn test_conditions(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(run(source, ""), format!("{}\n{}", expected, ALL_USED));
}
