mod common;

use common::parse_stmts;
use jparse::parser::ast::*;

fn stmt(ast: &Ast, id: StmtId) -> &Stmt {
    &ast.stmt(id).node
}

#[test]
fn local_variables_and_expression_statements() {
    let (ast, body) = parse_stmts("int a = 1, b; List<String> xs = new ArrayList<>(); a = b; foo(); x.y.z = 3;");
    assert_eq!(body.len(), 5);
    let Stmt::LocalVar(first) = stmt(&ast, body[0]) else { panic!() };
    assert_eq!(first.declarators.len(), 2);
    assert!(first.declarators[1].node.init.is_none());
    let Stmt::LocalVar(xs) = stmt(&ast, body[1]) else { panic!() };
    assert!(matches!(ast.ty(xs.ty).node, TypeNode::Generic { .. }));
    assert!(matches!(stmt(&ast, body[2]), Stmt::Expr(_)));
    assert!(matches!(stmt(&ast, body[3]), Stmt::Expr(_)));
    assert!(matches!(stmt(&ast, body[4]), Stmt::Expr(_)));
}

#[test]
fn final_locals_and_local_classes() {
    let (ast, body) = parse_stmts("final int n = 3; class Local { int v; } @SuppressWarnings(\"x\") String s = null;");
    let Stmt::LocalVar(n) = stmt(&ast, body[0]) else { panic!() };
    assert!(n.modifiers.has(Modifier::Final));
    let Stmt::LocalClass(decl) = stmt(&ast, body[1]) else { panic!() };
    assert_eq!(ast.decl(*decl).node.name.node, "Local");
    let Stmt::LocalVar(s) = stmt(&ast, body[2]) else { panic!() };
    assert_eq!(s.modifiers.annotations.len(), 1);
}

#[test]
fn if_else_chains_nest_in_the_else_branch() {
    let (ast, body) = parse_stmts("if (a) x(); else if (b) y(); else z();");
    let Stmt::If { else_branch: Some(inner), .. } = stmt(&ast, body[0]) else { panic!() };
    let Stmt::If { else_branch: Some(last), .. } = stmt(&ast, *inner) else { panic!() };
    assert!(matches!(stmt(&ast, *last), Stmt::Expr(_)));
}

#[test]
fn dangling_else_binds_to_nearest_if() {
    let (ast, body) = parse_stmts("if (a) if (b) x(); else y();");
    let Stmt::If { then_branch, else_branch: None, .. } = stmt(&ast, body[0]) else { panic!() };
    assert!(matches!(stmt(&ast, *then_branch), Stmt::If { else_branch: Some(_), .. }));
}

#[test]
fn loops() {
    let (ast, body) = parse_stmts(
        "for (int i = 0, j = 10; i < j; i++, j--) {} for (;;) break; for (String s : names) use(s); \
         while (running) step(); do { tick(); } while (!done);",
    );
    let Stmt::For { init, cond, update, .. } = stmt(&ast, body[0]) else { panic!() };
    assert_eq!(init.len(), 1);
    assert!(cond.is_some());
    assert_eq!(update.len(), 2);
    let Stmt::For { init, cond: None, update, .. } = stmt(&ast, body[1]) else { panic!() };
    assert!(init.is_empty() && update.is_empty());
    let Stmt::ForEach { name, .. } = stmt(&ast, body[2]) else { panic!() };
    assert_eq!(name.node, "s");
    assert!(matches!(stmt(&ast, body[3]), Stmt::While { .. }));
    assert!(matches!(stmt(&ast, body[4]), Stmt::DoWhile { .. }));
}

#[test]
fn for_with_expression_initializers() {
    let (ast, body) = parse_stmts("for (i = 0, j = 1; ; ) {}");
    let Stmt::For { init, .. } = stmt(&ast, body[0]) else { panic!() };
    assert_eq!(init.len(), 2);
    assert!(init.iter().all(|&s| matches!(stmt(&ast, s), Stmt::Expr(_))));
}

#[test]
fn classic_switch_keeps_fallthrough_structure() {
    let (ast, body) = parse_stmts(
        "switch (day) { case 1: case 7: weekend(); break; case 2, 3: work(); default: rest(); }",
    );
    let Stmt::SwitchClassic { cases, .. } = stmt(&ast, body[0]) else { panic!() };
    assert_eq!(cases.len(), 4);
    assert!(cases[0].node.body.is_empty());
    assert!(cases[0].node.falls_through(&ast));
    assert!(!cases[1].node.falls_through(&ast));
    assert_eq!(cases[2].node.labels.len(), 2);
    assert!(cases[2].node.falls_through(&ast));
    assert!(cases[3].node.is_default());
}

#[test]
fn arrow_switch_bodies() {
    let (ast, body) = parse_stmts(
        "switch (k) { case A -> go(); case B, C -> { stop(); } default -> throw new IllegalStateException(); }",
    );
    let Stmt::SwitchArrow { cases, .. } = stmt(&ast, body[0]) else { panic!() };
    assert!(matches!(cases[0].node.body, ArrowBody::Expr(_)));
    assert!(matches!(cases[1].node.body, ArrowBody::Block(_)));
    assert_eq!(cases[1].node.labels.len(), 2);
    assert!(matches!(cases[2].node.body, ArrowBody::Throw(_)));
    assert!(cases[2].node.is_default());
}

#[test]
fn switch_expression_with_yield() {
    let (ast, body) = parse_stmts(
        "int n = switch (s) { case \"a\": yield 1; default: { int t = 2; yield t; } };",
    );
    let Stmt::LocalVar(decl) = stmt(&ast, body[0]) else { panic!() };
    let init = decl.declarators[0].node.init.unwrap();
    let Expr::Switch { body: SwitchBody::Classic(cases), .. } = &ast.expr(init).node else { panic!() };
    assert!(matches!(stmt(&ast, cases[0].node.body[0]), Stmt::Yield(_)));
}

#[test]
fn yield_as_a_plain_name() {
    let (ast, body) = parse_stmts("yield = 3; yield++;");
    assert!(matches!(stmt(&ast, body[0]), Stmt::Expr(_)));
    assert!(matches!(stmt(&ast, body[1]), Stmt::Expr(_)));
}

#[test]
fn try_catch_finally_and_resources() {
    let (ast, body) = parse_stmts(
        "try (InputStream in = open(); final Reader r = wrap(in); existing) { read(in); } \
         catch (IOException | RuntimeException e) { log(e); } catch (final Exception e) { } finally { close(); }",
    );
    let Stmt::Try { resources, catches, finally, .. } = stmt(&ast, body[0]) else { panic!() };
    assert_eq!(resources.len(), 3);
    assert!(matches!(resources[0].node, Resource::Decl { .. }));
    assert!(matches!(resources[2].node, Resource::Expr(_)));
    assert_eq!(catches.len(), 2);
    assert_eq!(catches[0].node.types.len(), 2);
    assert!(catches[1].node.modifiers.has(Modifier::Final));
    assert!(finally.is_some());
}

#[test]
fn jumps_labels_and_misc() {
    let (ast, body) = parse_stmts(
        "outer: for (;;) { continue outer; } return; throw err; assert x > 0 : \"positive\"; \
         synchronized (lock) { n++; } ; break;",
    );
    let Stmt::Labeled { label, .. } = stmt(&ast, body[0]) else { panic!() };
    assert_eq!(label.node, "outer");
    assert!(matches!(stmt(&ast, body[1]), Stmt::Return(None)));
    assert!(matches!(stmt(&ast, body[2]), Stmt::Throw(_)));
    assert!(matches!(stmt(&ast, body[3]), Stmt::Assert { message: Some(_), .. }));
    assert!(matches!(stmt(&ast, body[4]), Stmt::Synchronized { .. }));
    assert!(matches!(stmt(&ast, body[5]), Stmt::Empty));
    assert!(matches!(stmt(&ast, body[6]), Stmt::Break(None)));
}

#[test]
fn generic_local_versus_comparison() {
    let (ast, body) = parse_stmts("Map<String, List<Integer>> m = null; a < b; i < n == ok;");
    assert!(matches!(stmt(&ast, body[0]), Stmt::LocalVar(_)));
    let Stmt::Expr(cmp) = stmt(&ast, body[1]) else { panic!() };
    assert!(matches!(ast.expr(*cmp).node, Expr::Binary { op: BinaryOp::Lt, .. }));
    assert!(matches!(stmt(&ast, body[2]), Stmt::Expr(_)));
}

#[test]
fn array_locals() {
    let (ast, body) = parse_stmts("int[][] grid = new int[3][]; String[] names = { \"a\", \"b\", };");
    let Stmt::LocalVar(grid) = stmt(&ast, body[0]) else { panic!() };
    assert!(matches!(ast.ty(grid.ty).node, TypeNode::Array { .. }));
    let init = grid.declarators[0].node.init.unwrap();
    assert!(matches!(ast.expr(init).node, Expr::NewArray { ref dims, extra_dims: 1, .. } if dims.len() == 1));
    let Stmt::LocalVar(names) = stmt(&ast, body[1]) else { panic!() };
    let init = names.declarators[0].node.init.unwrap();
    assert!(matches!(&ast.expr(init).node, Expr::ArrayInit(items) if items.len() == 2));
}
