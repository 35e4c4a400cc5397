mod common;

use common::normalize;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

#[test]
fn compact_class_is_laid_out() {
    let input = "package demo;import java.util.*;\npublic class Counter{private int count;public void inc(){count++;}\npublic int get(){return count;}}";

    assert_snapshot!(
        normalize(input),
        @r###"
package demo;

import java.util.*;

public class Counter {
    private int count;

    public void inc() {
        count++;
    }

    public int get() {
        return count;
    }
}
"###
    );
}

#[test]
fn control_flow_bodies() {
    let input = "class A { void m(int n) { for (int i=0;i<n;i++) { if (i%2==0) continue; else { total+=i; } } while(n>0) n--; } }";

    assert_snapshot!(
        normalize(input),
        @r###"
class A {
    void m(int n) {
        for (int i = 0; i < n; i++) {
            if (i % 2 == 0)
                continue;
            else {
                total += i;
            }
        }
        while (n > 0)
            n--;
    }
}
"###
    );
}

#[test]
fn stream_pipeline_stays_on_one_line() {
    let input = "class A { List<String> f(List<String> xs) { return xs.stream().filter(s->!s.isEmpty()).map(String::trim).collect(Collectors.toList()); } }";

    assert_snapshot!(
        normalize(input),
        @r###"
class A {
    List<String> f(List<String> xs) {
        return xs.stream().filter(s -> !s.isEmpty()).map(String::trim).collect(Collectors.toList());
    }
}
"###
    );
}

#[test]
fn anonymous_class_body_is_indented() {
    let input = "class A { Runnable r = new Runnable() { public void run() { System.out.println(\"hi\"); } }; }";

    assert_snapshot!(
        normalize(input),
        @r###"
class A {
    Runnable r = new Runnable() {
        public void run() {
            System.out.println("hi");
        }
    };
}
"###
    );
}

#[test]
fn enum_constants_with_bodies_and_members() {
    let input = "@Deprecated enum Op { PLUS(\"+\") { int apply(int a, int b) { return a + b; } }, MINUS(\"-\"); private final String sym; Op(String s) { sym = s; } }";

    assert_snapshot!(
        normalize(input),
        @r###"
@Deprecated
enum Op {
    PLUS("+") {
        int apply(int a, int b) {
            return a + b;
        }
    },
    MINUS("-");

    private final String sym;

    Op(String s) {
        sym = s;
    }
}
"###
    );
}

#[test]
fn layout_and_comments_do_not_matter() {
    let spread = "/* header */\nclass   A\n{\n  // field\n  int\n  x =\n  1 ;\n}\n";
    let packed = "class A{int x=1;}";
    assert_eq!(normalize(spread), normalize(packed));
}

#[test]
fn redundant_parentheses_are_removed() {
    let a = normalize("class A { int x = ((a + b)) * (c); boolean y = (p) && (q || r); }");
    assert_eq!(a, "class A {\n    int x = (a + b) * c;\n\n    boolean y = p && (q || r);\n}\n");
}

#[test]
fn output_reparses_to_the_same_text() {
    let input = r#"
        class Shapes {
            static <T extends Comparable<? super T>> T max(java.util.List<? extends T> xs) {
                T best = null;
                for (T x : xs) if (best == null || x.compareTo(best) > 0) best = x;
                return best;
            }
            int[][] grid = new int[3][4];
            Object pick(int k) {
                return switch (k) { case 0 -> "zero"; case 1, 2 -> { yield (Object) k; } default -> null; };
            }
        }
    "#;
    let once = normalize(input);
    let twice = jparse::normalize_source(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn indexing_a_fresh_array_survives_the_round_trip() {
    use jparse::parser::ast::{Expr, Member};

    let once = normalize("class A { int x = (new int[3])[0]; }");
    assert_eq!(once, "class A {\n    int x = (new int[3])[0];\n}\n");

    let ast = common::parse_ok(&once);
    let Member::Field(field) = common::members(&ast)[0] else { panic!("expected a field") };
    let init = field.declarators[0].node.init.unwrap();
    let Expr::ArrayAccess { array, .. } = &ast.expr(init).node else {
        panic!("expected an array access, got {:?}", ast.expr(init).node)
    };
    assert!(matches!(&ast.expr(*array).node, Expr::NewArray { dims, .. } if dims.len() == 1));
}
