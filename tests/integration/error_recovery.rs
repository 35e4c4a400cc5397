mod common;

use std::time::Instant;

use common::parse_errors;
use jparse::diagnostics::{format_plain, SourceError};
use jparse::parser::ast::Member;
use jparse::parser::{Interrupted, ParseOptions};
use jparse::{parse_source, FrontendError};

#[test]
fn without_recovery_only_the_first_error_is_reported() {
    let source = "class A { void m() { int x = ; foo(; } }";
    let result = parse_source(source, &ParseOptions::default()).unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].found, "`;`");
    assert!(result.errors[0].expected.contains("expression"));
}

#[test]
fn recovery_reports_every_broken_statement_and_member() {
    let errors = parse_errors("class A { void m() { int x = ; foo(; bar(); } int y = ; }");
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| e.found == "`;`"));
    let starts: Vec<usize> = errors.iter().map(|e| e.span.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[test]
fn recovery_keeps_the_parts_that_parse() {
    let source = "class A { int x = ; void ok() { a(); } }";
    let options = ParseOptions { recover: true, deadline: None };
    let result = parse_source(source, &options).unwrap();
    assert_eq!(result.errors.len(), 1);
    let decl = &result.ast.top_level().next().unwrap().node;
    assert_eq!(decl.members.len(), 1);
    let Member::Method(ok) = &result.ast.member(decl.members[0]).node else { panic!() };
    assert_eq!(ok.name.node, "ok");
}

#[test]
fn missing_semicolon_points_at_the_next_token() {
    let source = "class A {\n    int x\n}\n";
    let result = parse_source(source, &ParseOptions::default()).unwrap();
    let errors: Vec<SourceError> = result.errors.into_iter().map(SourceError::Parse).collect();
    assert_eq!(
        format_plain("A.java", source, &errors),
        "A.java:3:1: syntax error: expected ;, found `}`\n"
    );
}

#[test]
fn unclosed_parenthesis() {
    let errors = parse_errors("class A { int x = (1 + 2; }");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].expected.contains(")"));
    assert_eq!(errors[0].found, "`;`");
}

#[test]
fn unexpected_end_of_file() {
    let source = "class A { void m() { x(); }";
    let result = parse_source(source, &ParseOptions::default()).unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].found, "end of file");
    assert_eq!(result.errors[0].span.start, source.len());
}

#[test]
fn top_level_statement_is_rejected() {
    let errors = parse_errors("int x;");
    assert!(!errors.is_empty());
    assert_eq!(errors[0].found, "`int`");
}

#[test]
fn mixing_switch_label_forms_is_an_error() {
    let errors = parse_errors("class A { void m() { switch (d) { case 1 -> a(); case 2: b(); } } }");
    assert!(!errors.is_empty());
    assert_eq!(errors[0].found, "`:`");
    assert!(errors[0].expected.contains("->"));
}

#[test]
fn lex_errors_stop_before_parsing() {
    let err = parse_source("class A { String s = \"open; }", &ParseOptions::default()).unwrap_err();
    let FrontendError::Lex(lex) = err else { panic!("expected a lex error") };
    assert_eq!(lex.offset, 21);
}

#[test]
fn expired_deadline_interrupts_the_parse() {
    let options = ParseOptions { recover: true, deadline: Some(Instant::now()) };
    let err = parse_source("class A { void m() { a(); b(); } }", &options).unwrap_err();
    assert_eq!(err, FrontendError::Interrupted(Interrupted::Deadline));
}

#[test]
fn normalize_source_returns_all_diagnostics() {
    let errors = jparse::normalize_source("class A { int x = ; }").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SourceError::Parse(_)));
}
