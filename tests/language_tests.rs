mod common;

use common::{interpreter_with_output, run, run_with};
use pretty_assertions::assert_eq;
use stak::runtime::{
    config::InterpreterConfig,
    data_structures::value::Value,
    error::ErrorKind,
    interpreter::{CodeManagement, Interpreter, InterpreterStack, WordManagement},
};
use test_case::test_case;

fn output_of(source: &str) -> String {
    let (result, output) = run(source);

    assert!(result.is_ok(), "Script failed: {:?}", result.err());
    output
}

fn error_kind_of(config: InterpreterConfig, source: &str) -> ErrorKind {
    let (result, _) = run_with(config, source);

    match result {
        Ok(()) => panic!("Script {:?} should have failed.", source),
        Err(error) => error.kind(),
    }
}

#[test_case("1 2 + stdout", "3\n"; "add")]
#[test_case("2 3 4 + stdout", "9\n"; "operators fold the whole stack")]
#[test_case("10 3 - stdout", "7\n"; "subtract")]
#[test_case("7 2 / stdout", "3\n"; "divide")]
#[test_case("1 true 2 + stdout", "3\n"; "operators skip booleans")]
#[test_case("1 4 << stdout", "16\n"; "shift left lexes as one token")]
#[test_case("-8 1 >> stdout", "-4\n"; "shift right")]
#[test_case("6 3 & stdout 6 3 | stdout 6 3 ^ stdout", "2\n7\n5\n"; "bitwise")]
#[test_case("--5 stdout", "5\n"; "double negation")]
#[test_case("1 2 < stdout", "true\n"; "less")]
#[test_case("1 2 = stdout", "false\n"; "equal")]
#[test_case("true false != stdout", "true\n"; "not equal")]
#[test_case("1 true = stdout", "false\n"; "mixed kinds are never equal")]
#[test_case("0 stdout", ""; "zero counts as empty")]
#[test_case("5 dup + stdout", "10\n"; "dup")]
#[test_case("1 2 drop stdout", "1\n"; "drop")]
#[test_case("1 2 swap stdout stdout", "1\n2\n"; "swap")]
#[test_case("1 2 over stdout stdout stdout", "1\n2\n1\n"; "over")]
#[test_case("1 2 3 rot stdout stdout stdout", "1\n2\n3\n"; "rot exchanges top and third")]
#[test_case("0 5 size stdout", "1\n"; "size skips zeros")]
#[test_case("3 print", "3\n"; "print is stdout")]
#[test_case("// a comment\n1 stdout // another\n", "1\n"; "comments")]
#[test_case("true if begin 1 stdout end 2 stdout", "1\n2\n"; "if taken")]
#[test_case("false if begin 1 stdout end 2 stdout", "2\n"; "if skipped")]
#[test_case("true if begin true if begin 7 stdout end end", "7\n"; "nested blocks")]
#[test_case("5 !x x x * stdout", "25\n"; "variables")]
#[test_case("1 !x 2 !x x stdout", "2\n"; "rebinding replaces")]
#[test_case("1 !x ?x 2 stdout", "2\n"; "unbind")]
#[test_case("3 !x x 0 > while begin x stdout x 1 - !x x 0 > end", "3\n2\n1\n"; "while")]
#[test_case("false while begin 1 stdout end 2 stdout", "2\n"; "while skipped")]
#[test_case("double proc begin dup + end 4 double stdout", "8\n"; "procedure")]
#[test_case("f proc begin 1 stdout end f f proc begin 2 stdout end f", "1\n2\n"; "redefinition")]
#[test_case(
    "down proc begin !n n stdout n 1 > if begin n 1 - down end end 3 down",
    "3\n2\n1\n";
    "recursion"
)]
#[test_case("true if begin 1 stdout", "1\n"; "unterminated block runs to the end")]
#[test_case("!x 1 stdout", "1\n"; "bind from an empty stack is skipped")]
#[test_case("1 !x !x x stdout", "1\n"; "skipped bind keeps the old value")]
#[test_case("begin 1 end stdout", "1\n"; "stray begin and end are ignored")]
#[test_case("end 2 stdout", "2\n"; "stray end is ignored")]
#[test_case(
    "5 !f 1 f proc begin 2 end stdout f stdout",
    "1\n5\n";
    "definition name is not read as a variable"
)]
fn program_output(source: &str, expected: &str) {
    assert_eq!(output_of(source), expected);
}

#[test_case("1 stdout y stdout", ErrorKind::Semantic; "unbound variable")]
#[test_case("undefined_proc", ErrorKind::Semantic; "undefined procedure")]
#[test_case("proc begin 1 end", ErrorKind::Semantic; "procedure without a name")]
#[test_case("?x", ErrorKind::Semantic; "unbind an unbound name")]
#[test_case("1 @", ErrorKind::Lexical; "unexpected character")]
#[test_case("true if 1 end", ErrorKind::Structural; "missing begin")]
#[test_case("true if begin end", ErrorKind::Structural; "empty block")]
#[test_case("1 if begin 2 end", ErrorKind::Type; "non boolean condition")]
#[test_case("if begin 2 end", ErrorKind::Type; "condition from an empty stack")]
#[test_case("true +", ErrorKind::Type; "operator without integers")]
#[test_case("true 1 <", ErrorKind::Type; "ordering mixed kinds")]
#[test_case("1 <", ErrorKind::Type; "comparison needs two values")]
#[test_case("1 0 /", ErrorKind::Numeric; "division by zero")]
#[test_case("1 -1 <<", ErrorKind::Numeric; "negative shift")]
fn program_errors(source: &str, expected: ErrorKind) {
    assert_eq!(error_kind_of(InterpreterConfig::default(), source), expected);
}

#[test_case("true if begin 1 stdout", ErrorKind::Structural; "unterminated block")]
#[test_case("drop", ErrorKind::Stack; "underflow")]
#[test_case("!x", ErrorKind::Stack; "bind from an empty stack")]
#[test_case("end", ErrorKind::Structural; "stray end")]
#[test_case("begin 1 end", ErrorKind::Structural; "stray begin")]
#[test_case("1 2 3", ErrorKind::Stack; "overflow")]
fn strict_errors(source: &str, expected: ErrorKind) {
    let config = InterpreterConfig::default()
        .with_stack_capacity(2)
        .with_strict(true);

    assert_eq!(error_kind_of(config, source), expected);
}

#[test]
fn output_before_an_error_is_kept() {
    let (result, output) = run("1 stdout y stdout");

    assert!(result.is_err());
    assert_eq!(output, "1\n");
}

#[test]
fn strict_size_counts_zeros() {
    let config = InterpreterConfig::default().with_strict(true);
    let (result, output) = run_with(config, "0 0 size stdout");

    assert!(result.is_ok(), "Script failed: {:?}", result.err());
    assert_eq!(output, "2\n");
}

#[test]
fn lexical_errors_report_their_location() {
    let (result, _) = run("1 2 +\n  @");
    let error = result.unwrap_err();
    let location = error.location().clone().unwrap();

    assert_eq!(error.kind(), ErrorKind::Lexical);
    assert_eq!((location.line(), location.column()), (2, 3));
    assert!(error.error().contains("Unexpected character '@'"));
}

#[test]
fn runtime_errors_report_the_failing_token() {
    let (result, _) = run("1\n1 0 /");
    let error = result.unwrap_err();
    let location = error.location().clone().unwrap();

    assert_eq!(error.kind(), ErrorKind::Numeric);
    assert_eq!(location.path(), "<test>");
    assert_eq!((location.line(), location.column()), (2, 5));
}

#[test]
fn errors_inside_procedures_carry_the_call_stack() {
    let (result, _) = run("inner proc begin 1 0 / end\nouter proc begin inner end\nouter");
    let error = result.unwrap_err();
    let words: Vec<String> = error
        .call_stack()
        .clone()
        .unwrap_or_default()
        .iter()
        .map(|item| item.word().clone())
        .collect();

    assert_eq!(words, vec!["outer".to_string(), "inner".to_string()]);
    assert!(format!("{}", error).contains("Call stack"));
}

#[test]
fn call_stack_unwinds_after_a_call() {
    let (mut interpreter, _) = interpreter_with_output(InterpreterConfig::default());

    interpreter
        .process_source("<test>", "f proc begin 1 end f")
        .unwrap();

    assert!(interpreter.call_stack().is_empty());
    assert_eq!(interpreter.stack().top(), Some(&Value::Int(1)));
}

#[test]
fn state_persists_between_sources_until_reset() {
    let (mut interpreter, output) = interpreter_with_output(InterpreterConfig::default());

    interpreter.process_source("<one>", "7 !x sq proc begin dup * end").unwrap();
    interpreter.process_source("<two>", "x sq stdout").unwrap();
    assert_eq!(output.text(), "49\n");

    interpreter.reset();

    assert!(interpreter.variables().is_empty());
    assert!(interpreter.procedures().is_empty());
    assert!(interpreter.stack().is_empty());
    assert_eq!(
        interpreter.process_source("<three>", "x").unwrap_err().kind(),
        ErrorKind::Semantic
    );
}

#[test]
fn interpreters_do_not_share_state() {
    let (mut first, _) = interpreter_with_output(InterpreterConfig::default());
    let (mut second, _) = interpreter_with_output(InterpreterConfig::default());

    first.process_source("<first>", "1 !x").unwrap();

    assert!(second.process_source("<second>", "x").is_err());
}

#[test]
fn full_stack_replaces_the_top() {
    let (mut interpreter, _) = interpreter_with_output(InterpreterConfig::default());
    let source: Vec<String> = (1..=17).map(|value| value.to_string()).collect();

    interpreter.process_source("<test>", &source.join(" ")).unwrap();

    assert_eq!(interpreter.stack().size(), 16);
    assert_eq!(interpreter.stack().top(), Some(&Value::Int(17)));
    assert_eq!(interpreter.pop().unwrap(), Some(Value::Int(17)));
    assert_eq!(interpreter.pop().unwrap(), Some(Value::Int(15)));
}

#[test]
fn interpreter_uses_its_config() {
    let config = InterpreterConfig::default().with_stack_capacity(4);
    let (interpreter, _) = interpreter_with_output(config.clone());

    assert_eq!(interpreter.config(), &config);
    assert_eq!(interpreter.stack().capacity(), 4);
}
