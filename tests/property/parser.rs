// Property-based tests for the parser and normalizer:
// 1. Parse determinism: same source, structurally equal AST
// 2. No panics on arbitrary token soup
// 3. Every node span is non-empty and inside the source
// 4. Normalization is idempotent on generated programs

use jparse::parser::ast::NodeKind;
use jparse::parser::{parse, ParseOptions};
use jparse::pretty::normalize;
use jparse::visit::collect_nodes;
use jparse::{lexer::tokenize, parse_source};
use proptest::prelude::*;

fn arb_ident() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "count", "value", "items", "x1", "_tmp", "$y"])
        .prop_map(str::to_string)
}

fn arb_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        (0u32..1000).prop_map(|n| format!("{n}L")),
        (0u32..100, 0u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
        "[a-z ]{0,8}".prop_map(|s| format!("\"{s}\"")),
        prop::sample::select(vec!["true", "false", "null", "'c'", "'\\n'"]).prop_map(str::to_string),
    ]
}

/// Random expressions, parenthesized where the grammar would otherwise change shape.
fn arb_expr() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![arb_ident(), arb_literal()];
    leaf.prop_recursive(4, 32, 3, |inner| {
        let binop = prop::sample::select(vec![
            "+", "-", "*", "/", "%", "<<", ">>", ">>>", "<", ">", "<=", ">=", "==", "!=", "&", "^",
            "|", "&&", "||",
        ]);
        prop_oneof![
            (inner.clone(), binop, inner.clone()).prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            (prop::sample::select(vec!["-", "+", "!", "~"]), inner.clone())
                .prop_map(|(op, e)| format!("{op}({e})")),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, a, b)| format!("({c} ? {a} : {b})")),
            (arb_ident(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(f, args)| format!("{f}({})", args.join(", "))),
            (arb_ident(), arb_ident()).prop_map(|(a, b)| format!("{a}.{b}")),
            (arb_ident(), inner.clone()).prop_map(|(a, i)| format!("{a}[{i}]")),
            inner.clone().prop_map(|e| format!("(int) ({e})")),
            inner.clone().prop_map(|e| format!("(String) {e}")),
            (arb_ident(), inner.clone()).prop_map(|(p, e)| format!("({p} -> {e})")),
            (arb_ident(), inner).prop_map(|(t, e)| format!("new {t}({e})")),
        ]
    })
}

fn arb_stmt() -> impl Strategy<Value = String> {
    let simple = prop_oneof![
        (arb_ident(), arb_expr()).prop_map(|(n, e)| format!("int {n} = {e};")),
        (arb_ident(), arb_expr()).prop_map(|(n, e)| format!("{n} = {e};")),
        (arb_ident(), arb_expr()).prop_map(|(n, e)| format!("{n} += {e};")),
        arb_ident().prop_map(|n| format!("{n}++;")),
        arb_expr().prop_map(|e| format!("return {e};")),
        Just("break;".to_string()),
        Just(";".to_string()),
    ];
    simple.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (arb_expr(), inner.clone()).prop_map(|(c, s)| format!("if ({c}) {s}")),
            (arb_expr(), inner.clone(), inner.clone())
                .prop_map(|(c, a, b)| format!("if ({c}) {{ {a} }} else {{ {b} }}")),
            (arb_expr(), inner.clone()).prop_map(|(c, s)| format!("while ({c}) {{ {s} }}")),
            (arb_ident(), arb_expr(), inner.clone())
                .prop_map(|(i, n, s)| format!("for (int {i} = 0; {i} < {n}; {i}++) {s}")),
            (arb_expr(), inner.clone(), inner.clone()).prop_map(|(e, a, b)| {
                format!("switch ({e}) {{ case 1: {a} break; default: {b} }}")
            }),
            (arb_expr(), arb_expr()).prop_map(|(e, v)| {
                format!("switch ({e}) {{ case 1, 2 -> f({v}); default -> {{ g(); }} }}")
            }),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| format!("try {{ {a} }} catch (A | B e) {{ {b} }} finally {{ }}")),
            (arb_ident(), inner.clone())
                .prop_map(|(r, a)| format!("try (var {r} = open()) {{ {a} }}")),
            prop::collection::vec(inner, 0..4).prop_map(|ss| format!("{{ {} }}", ss.join(" "))),
        ]
    })
}

fn arb_program() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(arb_stmt(), 0..5),
        prop::collection::vec(arb_ident(), 0..3),
    )
        .prop_map(|(stmts, fields)| {
            let fields: String = fields.iter().map(|f| format!("private int {f};\n")).collect();
            format!(
                "package p;\nimport java.util.*;\npublic class Gen {{\n{fields}void run(int n) {{\n{}\n}}\n}}\nenum Mode {{ ON, OFF(1) }}\n",
                stmts.join("\n")
            )
        })
}

fn arb_token_soup() -> impl Strategy<Value = String> {
    let tokens = prop::sample::select(vec![
        "class", "A", "{", "}", "(", ")", "int", "x", "=", ";", "if", "else", "switch", "case",
        "->", ":", "default", "<", ">", ">>", "new", "return", "1", "\"s\"", ",", ".", "@Ann",
        "extends", "implements", "try", "catch", "|", "?", "::", "[", "]", "...", "enum",
    ]);
    prop::collection::vec(tokens, 0..60).prop_map(|ts| ts.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn parse_is_deterministic(source in arb_program()) {
        let lexed = tokenize(&source).unwrap();
        let first = parse(&lexed.tokens, &source);
        let second = parse(&lexed.tokens, &source);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn generated_programs_parse_cleanly(source in arb_program()) {
        let result = parse_source(&source, &ParseOptions::default()).unwrap();
        prop_assert!(result.errors.is_empty(), "{:?}\n{}", result.errors, source);
    }

    #[test]
    fn normalize_is_idempotent(source in arb_program()) {
        let result = parse_source(&source, &ParseOptions::default()).unwrap();
        prop_assume!(result.errors.is_empty());
        let once = normalize(&result.ast);
        let reparsed = parse_source(&once, &ParseOptions::default()).unwrap();
        prop_assert!(reparsed.errors.is_empty(), "{:?}\n{}", reparsed.errors, once);
        let twice = normalize(&reparsed.ast);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn spans_are_non_empty_and_in_bounds(source in arb_program()) {
        let result = parse_source(&source, &ParseOptions::default()).unwrap();
        prop_assume!(result.errors.is_empty());
        let nodes = collect_nodes(&result.ast, |_, _| true);
        for &node in &nodes {
            let span = result.ast.span(node);
            prop_assert!(!span.is_empty(), "{:?} has empty span", node);
            prop_assert!(span.end <= source.len());
        }
        for kind in [NodeKind::Package, NodeKind::Import, NodeKind::Param, NodeKind::EnumConstant] {
            prop_assert!(nodes.iter().any(|&n| result.ast.kind(n) == kind), "no {:?} visited", kind);
        }
    }

    #[test]
    fn parser_never_panics_on_token_soup(source in arb_token_soup()) {
        if let Ok(lexed) = tokenize(&source) {
            let _ = parse(&lexed.tokens, &source);
            let options = ParseOptions { recover: true, deadline: None };
            let _ = jparse::parser::parse_with(&lexed.tokens, &source, &options);
        }
    }
}
