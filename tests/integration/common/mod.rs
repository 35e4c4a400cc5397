#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use jparse::diagnostics::ParseError;
use jparse::parser::ast::*;
use jparse::parser::{parse_with, ParseOptions};

pub fn jparse() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jparse"))
}

/// Parse `source`, asserting there are no errors.
pub fn parse_ok(source: &str) -> Ast {
    let result = jparse::parse_source(source, &ParseOptions::default()).unwrap();
    assert!(result.errors.is_empty(), "unexpected errors: {:?}\n{source}", result.errors);
    result.ast
}

/// Parse with recovery on and return every syntax error.
pub fn parse_errors(source: &str) -> Vec<ParseError> {
    let lexed = jparse::lexer::tokenize(source).unwrap();
    let options = ParseOptions { recover: true, deadline: None };
    parse_with(&lexed.tokens, source, &options).unwrap().errors
}

pub fn normalize(source: &str) -> String {
    jparse::pretty::normalize(&parse_ok(source))
}

/// The first top-level type.
pub fn first_type(ast: &Ast) -> &TypeDecl {
    &ast.top_level().next().expect("no type declared").node
}

/// Members of the first top-level type.
pub fn members(ast: &Ast) -> Vec<&Member> {
    first_type(ast).members.iter().map(|&m| &ast.member(m).node).collect()
}

/// Statements of the first method body of the first top-level type.
pub fn body_of_first_method(ast: &Ast) -> Vec<StmtId> {
    for member in members(ast) {
        if let Member::Method(method) = member {
            if let Some(body) = method.body {
                if let Stmt::Block(stmts) = &ast.stmt(body).node {
                    return stmts.clone();
                }
            }
        }
    }
    panic!("no method with a body");
}

/// Wrap statements in a method and parse them.
pub fn parse_stmts(stmts: &str) -> (Ast, Vec<StmtId>) {
    let ast = parse_ok(&format!("class T {{ void m() {{ {stmts} }} }}"));
    let body = body_of_first_method(&ast);
    (ast, body)
}

/// Parse one expression used as a field initializer.
pub fn parse_expr(expr: &str) -> (Ast, ExprId) {
    let ast = parse_ok(&format!("class T {{ Object f = {expr}; }}"));
    let Member::Field(field) = members(&ast)[0] else { panic!("expected a field") };
    let init = field.declarators[0].node.init.expect("field has no initializer");
    (ast, init)
}

pub fn write_file(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
