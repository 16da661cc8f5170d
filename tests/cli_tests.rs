// tests/cli_tests.rs
#![cfg(feature = "cli")]

use match_jsonpath::cli::{CheckOptions, CheckResult, CliError, execute_canonical, execute_check};

fn options(query: &str, input: Option<&str>) -> CheckOptions {
    CheckOptions {
        query: query.to_string(),
        input: input.map(str::to_string),
        ..Default::default()
    }
}

#[test]
fn test_check_prints_nodes_as_array() {
    let result = execute_check(&options("$.a[*]", Some(r#"{"a":[1,"x"]}"#))).unwrap();
    assert_eq!(result, CheckResult::Success(r#"[1,"x"]"#.to_string()));
}

#[test]
fn test_check_pretty() {
    let mut opts = options("$.a", Some(r#"{"a":{"b":1}}"#));
    opts.pretty = true;
    let result = execute_check(&opts).unwrap();
    assert_eq!(
        result,
        CheckResult::Success("[\n  {\n    \"b\": 1\n  }\n]".to_string())
    );
}

#[test]
fn test_check_not_found() {
    let result = execute_check(&options("$.missing", Some("{}"))).unwrap();
    assert_eq!(result, CheckResult::NotFound);
}

#[test]
fn test_check_syntax_only_needs_no_input() {
    let mut opts = options("$..book[?@.price < 10]", None);
    opts.syntax_only = true;
    assert_eq!(execute_check(&opts).unwrap(), CheckResult::SyntaxValid);
}

#[test]
fn test_check_errors() {
    assert!(matches!(
        execute_check(&options("$[", Some("{}"))),
        Err(CliError::Parse(_))
    ));
    assert!(matches!(
        execute_check(&options("$.a", None)),
        Err(CliError::NoInput)
    ));
    assert!(matches!(
        execute_check(&options("$.a", Some("{"))),
        Err(CliError::Json(_))
    ));
    assert!(matches!(
        execute_check(&options("$.a / 0", Some(r#"{"a":1}"#))),
        Err(CliError::Eval(_))
    ));
}

#[test]
fn test_check_silent_suppresses_evaluation_errors() {
    let mut opts = options("$.a / 0", Some(r#"{"a":1}"#));
    opts.silent = true;
    assert_eq!(execute_check(&opts).unwrap(), CheckResult::NotFound);
}

#[test]
fn test_canonical() {
    assert_eq!(
        execute_canonical("$['store'][?(@.price<10)]").unwrap(),
        "$.store[?@.price < 10]"
    );
    assert!(execute_canonical("$.").is_err());
}
