mod common;

use common::{first_type, members, parse_ok};
use jparse::parser::ast::*;

#[test]
fn class_with_one_superclass_and_one_interface() {
    let ast = parse_ok("class C extends Base implements IFace { }");
    let decl = first_type(&ast);
    assert_eq!(decl.kind, TypeDeclKind::Class);
    let sup = decl.superclass().expect("superclass");
    assert!(matches!(&ast.ty(sup).node, TypeNode::Named(n) if dotted(n) == "Base"));
    assert_eq!(decl.interfaces().len(), 1);
    assert!(matches!(&ast.ty(decl.interfaces()[0]).node, TypeNode::Named(n) if dotted(n) == "IFace"));
}

#[test]
fn abstract_class_with_abstract_and_concrete_methods() {
    let ast = parse_ok(
        "public abstract class Shape { public abstract double area(); public String name() { return \"shape\"; } }",
    );
    let decl = first_type(&ast);
    assert!(decl.modifiers.has(Modifier::Abstract));
    let ms = members(&ast);
    let Member::Method(area) = ms[0] else { panic!() };
    assert!(area.body.is_none());
    assert!(area.modifiers.has(Modifier::Abstract));
    let Member::Method(name) = ms[1] else { panic!() };
    assert!(name.body.is_some());
}

#[test]
fn interface_with_default_and_static_methods() {
    let ast = parse_ok(
        "interface Greeter extends A, B { String greet(String who); default void hi() { greet(\"x\"); } static Greeter of() { return null; } }",
    );
    let decl = first_type(&ast);
    assert_eq!(decl.kind, TypeDeclKind::Interface);
    assert_eq!(decl.interfaces().len(), 2);
    assert_eq!(decl.superclass(), None);
    let ms = members(&ast);
    let Member::Method(hi) = ms[1] else { panic!() };
    assert!(hi.modifiers.has(Modifier::Default));
    let Member::Method(of) = ms[2] else { panic!() };
    assert!(of.modifiers.has(Modifier::Static));
}

#[test]
fn enum_with_constructor_arguments_and_bodies() {
    let ast = parse_ok(
        "enum Planet { MERCURY(3.3e23, 2.4e6), EARTH(5.9e24, 6.3e6) { @Override public String toString() { return \"home\"; } }; \
         private final double mass, radius; Planet(double m, double r) { mass = m; radius = r; } }",
    );
    let decl = first_type(&ast);
    assert_eq!(decl.kind, TypeDeclKind::Enum);
    assert_eq!(decl.enum_constants.len(), 2);
    assert_eq!(decl.enum_constants[0].node.args.as_ref().unwrap().len(), 2);
    assert!(decl.enum_constants[0].node.body.is_none());
    assert_eq!(decl.enum_constants[1].node.body.as_ref().unwrap().len(), 1);
    let ms = members(&ast);
    let Member::Field(field) = ms[0] else { panic!() };
    assert_eq!(field.declarators.len(), 2);
    let Member::Method(ctor) = ms[1] else { panic!() };
    assert!(ctor.is_constructor());
}

#[test]
fn annotation_type_with_defaults() {
    let ast = parse_ok(
        "@Retention(RetentionPolicy.RUNTIME) @interface Builder { String prefix() default \"with\"; int[] sizes() default {1, 2}; }",
    );
    let decl = first_type(&ast);
    assert_eq!(decl.kind, TypeDeclKind::Annotation);
    assert_eq!(decl.modifiers.annotations.len(), 1);
    let ms = members(&ast);
    let Member::Method(prefix) = ms[0] else { panic!() };
    assert!(matches!(prefix.default_value, Some(ElementValue::Expr(_))));
    let Member::Method(sizes) = ms[1] else { panic!() };
    assert!(matches!(&sizes.default_value, Some(ElementValue::Array(items)) if items.len() == 2));
}

#[test]
fn annotations_are_opaque_metadata() {
    let ast = parse_ok(
        "@Entity @Table(name = \"users\", schema = \"public\") class User { @Id @GeneratedValue(strategy = GenerationType.IDENTITY) private Long id; }",
    );
    let decl = first_type(&ast);
    let names: Vec<String> = decl.modifiers.annotations.iter().map(|a| a.node.qualified_name()).collect();
    assert_eq!(names, vec!["Entity", "Table"]);
    let Member::Field(id) = members(&ast)[0] else { panic!() };
    assert!(id.modifiers.annotation("Id").is_some());
    assert!(id.modifiers.annotation("GeneratedValue").is_some());
    assert!(matches!(ast.ty(id.ty).node, TypeNode::Boxed(BoxedType::Long)));
}

#[test]
fn generics_and_varargs() {
    let ast = parse_ok(
        "class Box<T extends Comparable<? super T>> { <R> Box<R> map(java.util.function.Function<? super T, ? extends R> f, Object... rest) { return null; } }",
    );
    let decl = first_type(&ast);
    assert_eq!(decl.type_params.len(), 1);
    assert_eq!(decl.type_params[0].bounds.len(), 1);
    let Member::Method(map) = members(&ast)[0] else { panic!() };
    assert_eq!(map.type_params.len(), 1);
    assert_eq!(map.params.len(), 2);
    assert!(!map.params[0].node.varargs);
    assert!(map.params[1].node.varargs);
    let TypeNode::Generic { raw, args } = &ast.ty(map.params[0].node.ty).node else { panic!() };
    assert!(matches!(&ast.ty(*raw).node, TypeNode::Named(n) if n.len() == 4));
    assert_eq!(args.len(), 2);
}

#[test]
fn all_modifiers_are_recorded() {
    let ast = parse_ok(
        "class M { protected static volatile int a; private transient int b; public final synchronized native void c(); strictfp void d() {} }",
    );
    let ms = members(&ast);
    let Member::Field(a) = ms[0] else { panic!() };
    assert_eq!(a.modifiers.canonical(), vec![Modifier::Protected, Modifier::Static, Modifier::Volatile]);
    let Member::Method(c) = ms[2] else { panic!() };
    assert_eq!(c.modifiers.canonical(), vec![Modifier::Public, Modifier::Final, Modifier::Synchronized, Modifier::Native]);
}

#[test]
fn nested_types_and_initializers() {
    let ast = parse_ok(
        "class Outer { static int n; static { n = 1; } { n++; } static class Inner {} interface Cb { void call(); } enum E { X } }",
    );
    let ms = members(&ast);
    assert!(matches!(ms[1], Member::Initializer(Initializer { is_static: true, .. })));
    assert!(matches!(ms[2], Member::Initializer(Initializer { is_static: false, .. })));
    let kinds: Vec<TypeDeclKind> = ms[3..]
        .iter()
        .map(|m| match m {
            Member::Type(d) => ast.decl(*d).node.kind,
            _ => panic!("expected a member type"),
        })
        .collect();
    assert_eq!(kinds, vec![TypeDeclKind::Class, TypeDeclKind::Interface, TypeDeclKind::Enum]);
}

#[test]
fn package_and_imports() {
    let ast = parse_ok("package com.example.app; import java.util.*; import static org.junit.Assert.assertEquals; class A {}");
    let package = ast.unit.package.as_ref().unwrap();
    assert_eq!(dotted(&package.node.name), "com.example.app");
    assert_eq!(ast.unit.imports.len(), 2);
    assert!(ast.unit.imports[0].node.wildcard);
    assert_eq!(ast.unit.imports[0].node.full_path(), "java.util");
    assert!(ast.unit.imports[1].node.is_static);
    assert_eq!(ast.unit.imports[1].node.full_path(), "org.junit.Assert.assertEquals");
}

#[test]
fn array_dimensions_after_names() {
    let ast = parse_ok("class A { int[] a, b[]; void m(String args[]) {} }");
    let ms = members(&ast);
    let Member::Field(f) = ms[0] else { panic!() };
    assert_eq!(f.declarators[0].node.dims, 0);
    assert_eq!(f.declarators[1].node.dims, 1);
}

#[test]
fn doc_comments_attach_to_declarations() {
    let ast = parse_ok("/** Type doc. */ class A { /** Field doc. */ int x; // not doc\n void m() {} }");
    assert!(first_type(&ast).doc.is_some());
    let ms = members(&ast);
    let Member::Field(x) = ms[0] else { panic!() };
    assert!(x.doc.is_some());
    let Member::Method(m) = ms[1] else { panic!() };
    assert!(m.doc.is_none());
}

#[test]
fn multiple_top_level_types() {
    let ast = parse_ok("class A {} interface B {} enum C { X } @interface D {}");
    let kinds: Vec<TypeDeclKind> = ast.top_level().map(|d| d.node.kind).collect();
    assert_eq!(
        kinds,
        vec![TypeDeclKind::Class, TypeDeclKind::Interface, TypeDeclKind::Enum, TypeDeclKind::Annotation]
    );
}
