mod common;

use common::parse_expr;
use jparse::parser::ast::*;

fn node(ast: &Ast, id: ExprId) -> &Expr {
    &ast.expr(id).node
}

fn binary(ast: &Ast, id: ExprId) -> (BinaryOp, ExprId, ExprId) {
    match node(ast, id) {
        Expr::Binary { op, lhs, rhs } => (*op, *lhs, *rhs),
        other => panic!("expected a binary expression, got {other:?}"),
    }
}

#[test]
fn precedence_follows_java() {
    let (ast, root) = parse_expr("a || b && c | d ^ e & f == g < h << i + j * k");
    let expected = [
        BinaryOp::Or,
        BinaryOp::And,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
        BinaryOp::BitAnd,
        BinaryOp::Eq,
        BinaryOp::Lt,
        BinaryOp::ShiftLeft,
        BinaryOp::Add,
        BinaryOp::Mul,
    ];
    let mut cur = root;
    for op in expected {
        let (found, _, rhs) = binary(&ast, cur);
        assert_eq!(found, op);
        cur = rhs;
    }
    assert!(matches!(node(&ast, cur), Expr::Name(n) if n.node == "k"));
}

#[test]
fn parentheses_override_precedence() {
    let (ast, root) = parse_expr("(a + b) * c");
    let (op, lhs, _) = binary(&ast, root);
    assert_eq!(op, BinaryOp::Mul);
    assert_eq!(binary(&ast, lhs).0, BinaryOp::Add);
}

#[test]
fn shifts_built_from_adjacent_angles() {
    let (ast, root) = parse_expr("a >> 2 >>> 1");
    let (op, lhs, _) = binary(&ast, root);
    assert_eq!(op, BinaryOp::UnsignedShiftRight);
    assert_eq!(binary(&ast, lhs).0, BinaryOp::ShiftRight);

    let (ast, root) = parse_expr("a > b >= c");
    let (op, lhs, _) = binary(&ast, root);
    assert_eq!(op, BinaryOp::Ge);
    assert_eq!(binary(&ast, lhs).0, BinaryOp::Gt);
}

#[test]
fn unary_and_postfix() {
    let (ast, root) = parse_expr("-x++ + ~y - !z");
    let (op, lhs, rhs) = binary(&ast, root);
    assert_eq!(op, BinaryOp::Sub);
    let (_, neg, _) = binary(&ast, lhs);
    let Expr::Unary { op: UnaryOp::Neg, operand } = node(&ast, neg) else { panic!() };
    assert!(matches!(node(&ast, *operand), Expr::Unary { op: UnaryOp::PostInc, .. }));
    assert!(matches!(node(&ast, rhs), Expr::Unary { op: UnaryOp::Not, .. }));
}

#[test]
fn ternary_and_assignment() {
    let (ast, root) = parse_expr("x = a ? b : c ? d : e");
    let Expr::Assign { op: AssignOp::Assign, value, .. } = node(&ast, root) else { panic!() };
    let Expr::Ternary { else_expr, .. } = node(&ast, *value) else { panic!() };
    assert!(matches!(node(&ast, *else_expr), Expr::Ternary { .. }));

    let (ast, root) = parse_expr("a >>>= b <<= 2");
    let Expr::Assign { op: AssignOp::UnsignedShiftRight, value, .. } = node(&ast, root) else { panic!() };
    assert!(matches!(node(&ast, *value), Expr::Assign { op: AssignOp::ShiftLeft, .. }));
}

#[test]
fn casts() {
    let (ast, root) = parse_expr("(int) x + 1");
    let (_, lhs, _) = binary(&ast, root);
    assert!(matches!(node(&ast, lhs), Expr::Cast { .. }));

    let (ast, root) = parse_expr("(List<String>) raw");
    let Expr::Cast { ty, .. } = node(&ast, root) else { panic!() };
    assert!(matches!(ast.ty(*ty).node, TypeNode::Generic { .. }));

    let (ast, root) = parse_expr("(a) - b");
    assert_eq!(binary(&ast, root).0, BinaryOp::Sub);

    let (ast, root) = parse_expr("(long) -1");
    assert!(matches!(node(&ast, root), Expr::Cast { .. }));

    let (ast, root) = parse_expr("(String[]) items");
    let Expr::Cast { ty, .. } = node(&ast, root) else { panic!() };
    assert!(matches!(ast.ty(*ty).node, TypeNode::Array { .. }));
}

#[test]
fn lambdas() {
    let (ast, root) = parse_expr("x -> x * 2");
    assert!(matches!(node(&ast, root), Expr::Lambda { params: LambdaParams::Inferred(p), body: LambdaBody::Expr(_) } if p.len() == 1));

    let (ast, root) = parse_expr("(a, b) -> { return a + b; }");
    assert!(matches!(node(&ast, root), Expr::Lambda { params: LambdaParams::Inferred(p), body: LambdaBody::Block(_) } if p.len() == 2));

    let (ast, root) = parse_expr("(int a, final String b) -> a");
    assert!(matches!(node(&ast, root), Expr::Lambda { params: LambdaParams::Typed(p), .. } if p.len() == 2));

    let (ast, root) = parse_expr("() -> {}");
    assert!(matches!(node(&ast, root), Expr::Lambda { params: LambdaParams::Inferred(p), .. } if p.is_empty()));
}

#[test]
fn method_calls_and_chains() {
    let (ast, root) = parse_expr("list.stream().filter(s -> !s.isEmpty()).<String>map(f).collect(toList())");
    let Expr::MethodCall { name, target: Some(target), args, .. } = node(&ast, root) else { panic!() };
    assert_eq!(name.node, "collect");
    assert_eq!(args.len(), 1);
    let Expr::MethodCall { name, type_args, .. } = node(&ast, *target) else { panic!() };
    assert_eq!(name.node, "map");
    assert_eq!(type_args.len(), 1);
}

#[test]
fn field_access_array_access_and_this() {
    let (ast, root) = parse_expr("this.items[i + 1].value");
    let Expr::FieldAccess { target, name } = node(&ast, root) else { panic!() };
    assert_eq!(name.node, "value");
    let Expr::ArrayAccess { array, .. } = node(&ast, *target) else { panic!() };
    assert!(matches!(node(&ast, *array), Expr::FieldAccess { .. }));

    let (ast, root) = parse_expr("Outer.this.x");
    let Expr::FieldAccess { target, .. } = node(&ast, root) else { panic!() };
    assert!(matches!(node(&ast, *target), Expr::FieldAccess { name, .. } if name.node == "this"));
}

#[test]
fn object_and_array_creation() {
    let (ast, root) = parse_expr("new HashMap<String, Integer>()");
    assert!(matches!(node(&ast, root), Expr::New { body: None, .. }));

    let (ast, root) = parse_expr("new Runnable() { public void run() {} }");
    assert!(matches!(node(&ast, root), Expr::New { body: Some(b), .. } if b.len() == 1));

    let (ast, root) = parse_expr("new int[] {1, 2, 3}");
    assert!(matches!(node(&ast, root), Expr::NewArray { init: Some(_), .. }));

    let (ast, root) = parse_expr("new String[n][m][]");
    assert!(matches!(node(&ast, root), Expr::NewArray { dims, extra_dims: 1, init: None, .. } if dims.len() == 2));
}

#[test]
fn method_references() {
    for (src, expected) in [("String::valueOf", "valueOf"), ("this::handle", "handle"), ("ArrayList::new", "new"), ("int[]::clone", "clone")] {
        let (ast, root) = parse_expr(src);
        let Expr::MethodRef { name, .. } = node(&ast, root) else { panic!("{src}") };
        assert_eq!(name.node, expected);
    }
}

#[test]
fn instanceof_with_and_without_binding() {
    let (ast, root) = parse_expr("o instanceof String s && s.isEmpty()");
    let (op, lhs, _) = binary(&ast, root);
    assert_eq!(op, BinaryOp::And);
    assert!(matches!(node(&ast, lhs), Expr::InstanceOf { binding: Some(_), .. }));

    let (ast, root) = parse_expr("o instanceof java.util.List");
    assert!(matches!(node(&ast, root), Expr::InstanceOf { binding: None, .. }));
}

#[test]
fn class_literals() {
    let (ast, root) = parse_expr("String.class");
    assert!(matches!(node(&ast, root), Expr::ClassLiteral(_)));
    let (ast, root) = parse_expr("int[].class");
    let Expr::ClassLiteral(ty) = node(&ast, root) else { panic!() };
    assert!(matches!(ast.ty(*ty).node, TypeNode::Array { .. }));
    let (ast, root) = parse_expr("void.class");
    assert!(matches!(node(&ast, root), Expr::ClassLiteral(_)));
}

#[test]
fn literals_keep_their_spelling() {
    let cases = [
        ("0x1F", Literal::Int("0x1F".into())),
        ("1_000L", Literal::Long("1_000L".into())),
        ("1.5f", Literal::Float("1.5f".into())),
        ("2e10", Literal::Double("2e10".into())),
        ("'\\t'", Literal::Char("\t".into())),
        ("true", Literal::Bool(true)),
        ("null", Literal::Null),
    ];
    for (src, expected) in cases {
        let (ast, root) = parse_expr(src);
        assert_eq!(node(&ast, root), &Expr::Literal(expected), "{src}");
    }
}

#[test]
fn switch_expression_with_arrows() {
    let (ast, root) = parse_expr("switch (d) { case MONDAY, FRIDAY -> 6; case TUESDAY -> 7; default -> { yield 0; } }");
    let Expr::Switch { body: SwitchBody::Arrow(cases), .. } = node(&ast, root) else { panic!() };
    assert_eq!(cases.len(), 3);
    assert_eq!(cases[0].node.labels.len(), 2);
}

#[test]
fn explicit_constructor_calls() {
    let ast = common::parse_ok("class A extends B { A() { super(1); } A(int x) { this(); } }");
    let members = common::members(&ast);
    let Member::Method(ctor) = members[0] else { panic!() };
    let Stmt::Block(stmts) = &ast.stmt(ctor.body.unwrap()).node else { panic!() };
    let Stmt::Expr(call) = &ast.stmt(stmts[0]).node else { panic!() };
    assert!(matches!(node(&ast, *call), Expr::MethodCall { target: None, name, .. } if name.node == "super"));
}
