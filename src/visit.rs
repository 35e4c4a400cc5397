//! Uniform traversal over the arena AST.
//!
//! Every node is reachable as a [`NodeRef`], and [`Ast::children`] lists the
//! direct children of any node in source order. On top of that:
//!
//! - [`Visitor`] and [`walk`]: a pre-order walk with `enter`/`leave` hooks,
//!   driven by an explicit stack so deeply nested input cannot overflow it.
//! - [`ParentMap`]: the back-reference from a node to its enclosing node.
//! - Small composers ([`any_node`], [`count_nodes`], [`collect_nodes`]) for
//!   passes that only need a predicate.
//!
//! ```rust
//! use jparse::parser::ast::{Ast, NodeKind, NodeRef};
//! use jparse::visit::{walk, Visitor};
//!
//! struct LambdaCounter(usize);
//!
//! impl Visitor for LambdaCounter {
//!     fn enter(&mut self, ast: &Ast, node: NodeRef) -> bool {
//!         if ast.kind(node) == NodeKind::Lambda {
//!             self.0 += 1;
//!         }
//!         true
//!     }
//! }
//!
//! let ast = jparse::parse_source("class A { Runnable r = () -> {}; }", &Default::default()).unwrap().ast;
//! let mut counter = LambdaCounter(0);
//! walk(&mut counter, &ast);
//! assert_eq!(counter.0, 1);
//! ```

use std::collections::HashMap;

use crate::parser::ast::*;

/// Hooks for [`walk`]. Both default to doing nothing and descending everywhere.
pub trait Visitor {
    /// Called before the children of `node`. Returning `false` skips them,
    /// and `leave` is not called for `node`.
    fn enter(&mut self, _ast: &Ast, _node: NodeRef) -> bool {
        true
    }

    fn leave(&mut self, _ast: &Ast, _node: NodeRef) {}
}

enum Frame {
    Enter(NodeRef),
    Leave(NodeRef),
}

/// Walk every root of the tree in source order.
pub fn walk<V: Visitor>(v: &mut V, ast: &Ast) {
    for root in ast.roots() {
        walk_from(v, ast, root);
    }
}

/// Walk the subtree rooted at `root`.
pub fn walk_from<V: Visitor>(v: &mut V, ast: &Ast, root: NodeRef) {
    let mut stack = vec![Frame::Enter(root)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(node) => {
                if !v.enter(ast, node) {
                    continue;
                }
                stack.push(Frame::Leave(node));
                let children = ast.children(node);
                stack.extend(children.into_iter().rev().map(Frame::Enter));
            }
            Frame::Leave(node) => v.leave(ast, node),
        }
    }
}

/// Child-to-parent links for every node reachable from the roots.
#[derive(Debug, Clone, Default)]
pub struct ParentMap {
    parents: HashMap<NodeRef, NodeRef>,
}

impl ParentMap {
    pub fn build(ast: &Ast) -> Self {
        let mut parents = HashMap::new();
        let mut stack = ast.roots();
        while let Some(node) = stack.pop() {
            for child in ast.children(node) {
                parents.insert(child, node);
                stack.push(child);
            }
        }
        Self { parents }
    }

    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.parents.get(&node).copied()
    }

    /// Enclosing nodes from the direct parent outwards.
    pub fn ancestors(&self, node: NodeRef) -> impl Iterator<Item = NodeRef> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// The innermost enclosing type declaration.
    pub fn enclosing_decl(&self, node: NodeRef) -> Option<DeclId> {
        self.ancestors(node).find_map(|n| match n {
            NodeRef::Decl(id) => Some(id),
            _ => None,
        })
    }
}

pub fn any_node<F>(ast: &Ast, predicate: F) -> bool
where
    F: Fn(&Ast, NodeRef) -> bool,
{
    struct Detector<F> {
        predicate: F,
        found: bool,
    }

    impl<F: Fn(&Ast, NodeRef) -> bool> Visitor for Detector<F> {
        fn enter(&mut self, ast: &Ast, node: NodeRef) -> bool {
            if self.found {
                return false;
            }
            if (self.predicate)(ast, node) {
                self.found = true;
                return false;
            }
            true
        }
    }

    let mut detector = Detector { predicate, found: false };
    walk(&mut detector, ast);
    detector.found
}

pub fn count_nodes<F>(ast: &Ast, predicate: F) -> usize
where
    F: Fn(&Ast, NodeRef) -> bool,
{
    collect_nodes(ast, predicate).len()
}

/// Matching nodes in pre-order.
pub fn collect_nodes<F>(ast: &Ast, predicate: F) -> Vec<NodeRef>
where
    F: Fn(&Ast, NodeRef) -> bool,
{
    struct Collector<F> {
        predicate: F,
        found: Vec<NodeRef>,
    }

    impl<F: Fn(&Ast, NodeRef) -> bool> Visitor for Collector<F> {
        fn enter(&mut self, ast: &Ast, node: NodeRef) -> bool {
            if (self.predicate)(ast, node) {
                self.found.push(node);
            }
            true
        }
    }

    let mut collector = Collector { predicate, found: Vec::new() };
    walk(&mut collector, ast);
    collector.found
}

impl Ast {
    /// Nodes with no parent: the package clause, imports and top-level type
    /// declarations.
    pub fn roots(&self) -> Vec<NodeRef> {
        let mut roots = Vec::new();
        if self.unit.package.is_some() {
            roots.push(NodeRef::Package);
        }
        roots.extend((0..self.unit.imports.len()).map(|i| NodeRef::Import(i as u32)));
        roots.extend(self.unit.types.iter().map(|&id| NodeRef::Decl(id)));
        roots
    }

    /// Direct children of `node`, in source order.
    pub fn children(&self, node: NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        match node {
            NodeRef::Decl(id) => self.decl_children(&mut out, id),
            NodeRef::Member(id) => self.member_children(&mut out, id),
            NodeRef::Stmt(id) => self.stmt_children(&mut out, id),
            NodeRef::Expr(id) => self.expr_children(&mut out, id),
            NodeRef::Type(id) => type_children(&mut out, &self.ty(id).node),
            NodeRef::Package => {
                if let Some(package) = &self.unit.package {
                    for annotation in &package.node.annotations {
                        push_annotation(&mut out, &annotation.node);
                    }
                }
            }
            NodeRef::Import(_) => {}
            NodeRef::EnumConstant(decl, i) => {
                let constant = &self.decl(decl).node.enum_constants[i as usize].node;
                for annotation in &constant.annotations {
                    push_annotation(&mut out, &annotation.node);
                }
                if let Some(args) = &constant.args {
                    out.extend(args.iter().map(|&e| NodeRef::Expr(e)));
                }
                if let Some(body) = &constant.body {
                    out.extend(body.iter().map(|&m| NodeRef::Member(m)));
                }
            }
            NodeRef::Param(owner, i) => {
                let param = &self.params_of(owner)[i as usize].node;
                push_modifiers(&mut out, &param.modifiers);
                out.push(NodeRef::Type(param.ty));
            }
            NodeRef::Declarator(owner, i) => {
                out.extend(self.declarators_of(owner)[i as usize].node.init.map(NodeRef::Expr));
            }
            NodeRef::Resource(stmt, i) => self.resource_children(&mut out, stmt, i),
            NodeRef::Catch(stmt, i) => self.catch_children(&mut out, stmt, i),
            NodeRef::Case(owner, i) => self.case_children(&mut out, owner, i),
        }
        out
    }

    fn decl_children(&self, out: &mut Vec<NodeRef>, id: DeclId) {
        let decl = &self.decl(id).node;
        push_modifiers(out, &decl.modifiers);
        push_type_params(out, &decl.type_params);
        out.extend(decl.extends.iter().map(|&t| NodeRef::Type(t)));
        out.extend(decl.implements.iter().map(|&t| NodeRef::Type(t)));
        out.extend((0..decl.enum_constants.len()).map(|i| NodeRef::EnumConstant(id, i as u32)));
        out.extend(decl.members.iter().map(|&m| NodeRef::Member(m)));
    }

    fn member_children(&self, out: &mut Vec<NodeRef>, id: MemberId) {
        match &self.member(id).node {
            Member::Field(field) => {
                push_modifiers(out, &field.modifiers);
                out.push(NodeRef::Type(field.ty));
                push_indexed(out, field.declarators.len(), |i| {
                    NodeRef::Declarator(Owner::Member(id), i)
                });
            }
            Member::Method(method) => {
                push_modifiers(out, &method.modifiers);
                push_type_params(out, &method.type_params);
                if let Some(ty) = method.return_type {
                    out.push(NodeRef::Type(ty));
                }
                push_indexed(out, method.params.len(), |i| NodeRef::Param(Owner::Member(id), i));
                out.extend(method.throws.iter().map(|&t| NodeRef::Type(t)));
                if let Some(value) = &method.default_value {
                    push_element_value(out, value);
                }
                if let Some(body) = method.body {
                    out.push(NodeRef::Stmt(body));
                }
            }
            Member::Initializer(init) => out.push(NodeRef::Stmt(init.body)),
            Member::Type(decl) => out.push(NodeRef::Decl(*decl)),
        }
    }

    fn stmt_children(&self, out: &mut Vec<NodeRef>, id: StmtId) {
        match &self.stmt(id).node {
            Stmt::Block(stmts) => out.extend(stmts.iter().map(|&s| NodeRef::Stmt(s))),
            Stmt::LocalVar(decl) => {
                push_modifiers(out, &decl.modifiers);
                out.push(NodeRef::Type(decl.ty));
                push_indexed(out, decl.declarators.len(), |i| {
                    NodeRef::Declarator(Owner::Stmt(id), i)
                });
            }
            Stmt::LocalClass(decl) => out.push(NodeRef::Decl(*decl)),
            Stmt::Expr(e) | Stmt::Throw(e) | Stmt::Yield(e) => out.push(NodeRef::Expr(*e)),
            Stmt::If { cond, then_branch, else_branch } => {
                out.push(NodeRef::Expr(*cond));
                out.push(NodeRef::Stmt(*then_branch));
                out.extend(else_branch.map(NodeRef::Stmt));
            }
            Stmt::SwitchClassic { selector, cases } => {
                out.push(NodeRef::Expr(*selector));
                push_indexed(out, cases.len(), |i| NodeRef::Case(Owner::Stmt(id), i));
            }
            Stmt::SwitchArrow { selector, cases } => {
                out.push(NodeRef::Expr(*selector));
                push_indexed(out, cases.len(), |i| NodeRef::Case(Owner::Stmt(id), i));
            }
            Stmt::For { init, cond, update, body } => {
                out.extend(init.iter().map(|&s| NodeRef::Stmt(s)));
                out.extend(cond.map(NodeRef::Expr));
                out.extend(update.iter().map(|&e| NodeRef::Expr(e)));
                out.push(NodeRef::Stmt(*body));
            }
            Stmt::ForEach { modifiers, ty, iterable, body, .. } => {
                push_modifiers(out, modifiers);
                out.push(NodeRef::Type(*ty));
                out.push(NodeRef::Expr(*iterable));
                out.push(NodeRef::Stmt(*body));
            }
            Stmt::While { cond, body } => {
                out.push(NodeRef::Expr(*cond));
                out.push(NodeRef::Stmt(*body));
            }
            Stmt::DoWhile { body, cond } => {
                out.push(NodeRef::Stmt(*body));
                out.push(NodeRef::Expr(*cond));
            }
            Stmt::Try { resources, body, catches, finally } => {
                push_indexed(out, resources.len(), |i| NodeRef::Resource(id, i));
                out.push(NodeRef::Stmt(*body));
                push_indexed(out, catches.len(), |i| NodeRef::Catch(id, i));
                out.extend(finally.map(NodeRef::Stmt));
            }
            Stmt::Return(value) => out.extend(value.map(NodeRef::Expr)),
            Stmt::Assert { cond, message } => {
                out.push(NodeRef::Expr(*cond));
                out.extend(message.map(NodeRef::Expr));
            }
            Stmt::Labeled { body, .. } => out.push(NodeRef::Stmt(*body)),
            Stmt::Synchronized { lock, body } => {
                out.push(NodeRef::Expr(*lock));
                out.push(NodeRef::Stmt(*body));
            }
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty => {}
        }
    }

    fn resource_children(&self, out: &mut Vec<NodeRef>, stmt: StmtId, i: u32) {
        match &self.try_parts(stmt).0[i as usize].node {
            Resource::Decl { modifiers, ty, init, .. } => {
                push_modifiers(out, modifiers);
                out.push(NodeRef::Type(*ty));
                out.push(NodeRef::Expr(*init));
            }
            Resource::Expr(e) => out.push(NodeRef::Expr(*e)),
        }
    }

    fn catch_children(&self, out: &mut Vec<NodeRef>, stmt: StmtId, i: u32) {
        let catch = &self.try_parts(stmt).1[i as usize].node;
        push_modifiers(out, &catch.modifiers);
        out.extend(catch.types.iter().map(|&t| NodeRef::Type(t)));
        out.push(NodeRef::Stmt(catch.body));
    }

    fn case_children(&self, out: &mut Vec<NodeRef>, owner: Owner, i: u32) {
        match self.cases_of(owner) {
            CaseList::Classic(cases) => {
                let case = &cases[i as usize].node;
                out.extend(case.labels.iter().map(|&e| NodeRef::Expr(e)));
                out.extend(case.body.iter().map(|&s| NodeRef::Stmt(s)));
            }
            CaseList::Arrow(cases) => {
                let case = &cases[i as usize].node;
                out.extend(case.labels.iter().map(|&e| NodeRef::Expr(e)));
                out.push(match case.body {
                    ArrowBody::Expr(e) => NodeRef::Expr(e),
                    ArrowBody::Block(s) | ArrowBody::Throw(s) => NodeRef::Stmt(s),
                });
            }
        }
    }

    fn expr_children(&self, out: &mut Vec<NodeRef>, id: ExprId) {
        match &self.expr(id).node {
            Expr::Literal(_) | Expr::Name(_) | Expr::This | Expr::Super => {}
            Expr::Binary { lhs, rhs, .. } => {
                out.push(NodeRef::Expr(*lhs));
                out.push(NodeRef::Expr(*rhs));
            }
            Expr::Assign { target, value, .. } => {
                out.push(NodeRef::Expr(*target));
                out.push(NodeRef::Expr(*value));
            }
            Expr::Unary { operand, .. } => out.push(NodeRef::Expr(*operand)),
            Expr::Ternary { cond, then_expr, else_expr } => {
                out.push(NodeRef::Expr(*cond));
                out.push(NodeRef::Expr(*then_expr));
                out.push(NodeRef::Expr(*else_expr));
            }
            Expr::InstanceOf { expr, ty, .. } => {
                out.push(NodeRef::Expr(*expr));
                out.push(NodeRef::Type(*ty));
            }
            Expr::Cast { ty, expr } => {
                out.push(NodeRef::Type(*ty));
                out.push(NodeRef::Expr(*expr));
            }
            Expr::MethodCall { target, type_args, args, .. } => {
                out.extend(target.map(NodeRef::Expr));
                out.extend(type_args.iter().map(|&t| NodeRef::Type(t)));
                out.extend(args.iter().map(|&e| NodeRef::Expr(e)));
            }
            Expr::FieldAccess { target, .. } => out.push(NodeRef::Expr(*target)),
            Expr::ArrayAccess { array, index } => {
                out.push(NodeRef::Expr(*array));
                out.push(NodeRef::Expr(*index));
            }
            Expr::ArrayInit(items) => out.extend(items.iter().map(|&e| NodeRef::Expr(e))),
            Expr::Lambda { params, body } => {
                if let LambdaParams::Typed(params) = params {
                    push_indexed(out, params.len(), |i| NodeRef::Param(Owner::Expr(id), i));
                }
                out.push(match body {
                    LambdaBody::Expr(e) => NodeRef::Expr(*e),
                    LambdaBody::Block(s) => NodeRef::Stmt(*s),
                });
            }
            Expr::MethodRef { target, type_args, .. } => {
                out.push(match target {
                    MethodRefTarget::Expr(e) => NodeRef::Expr(*e),
                    MethodRefTarget::Type(t) => NodeRef::Type(*t),
                });
                out.extend(type_args.iter().map(|&t| NodeRef::Type(t)));
            }
            Expr::New { ty, args, body } => {
                out.push(NodeRef::Type(*ty));
                out.extend(args.iter().map(|&e| NodeRef::Expr(e)));
                if let Some(body) = body {
                    out.extend(body.iter().map(|&m| NodeRef::Member(m)));
                }
            }
            Expr::NewArray { element, dims, init, .. } => {
                out.push(NodeRef::Type(*element));
                out.extend(dims.iter().map(|&e| NodeRef::Expr(e)));
                out.extend(init.map(NodeRef::Expr));
            }
            Expr::ClassLiteral(ty) => out.push(NodeRef::Type(*ty)),
            Expr::Switch { selector, body } => {
                out.push(NodeRef::Expr(*selector));
                let len = match body {
                    SwitchBody::Classic(cases) => cases.len(),
                    SwitchBody::Arrow(cases) => cases.len(),
                };
                push_indexed(out, len, |i| NodeRef::Case(Owner::Expr(id), i));
            }
        }
    }
}

fn push_indexed(out: &mut Vec<NodeRef>, len: usize, node: impl Fn(u32) -> NodeRef) {
    out.extend((0..len as u32).map(node));
}

fn type_children(out: &mut Vec<NodeRef>, ty: &TypeNode) {
    match ty {
        TypeNode::Primitive(_) | TypeNode::Boxed(_) | TypeNode::Named(_) => {}
        TypeNode::Generic { raw, args } => {
            out.push(NodeRef::Type(*raw));
            out.extend(args.iter().map(|&t| NodeRef::Type(t)));
        }
        TypeNode::Array { element } => out.push(NodeRef::Type(*element)),
        TypeNode::Wildcard { bound } => {
            if let Some((_, t)) = bound {
                out.push(NodeRef::Type(*t));
            }
        }
    }
}

fn push_modifiers(out: &mut Vec<NodeRef>, modifiers: &ModifierSet) {
    for annotation in &modifiers.annotations {
        push_annotation(out, &annotation.node);
    }
}

fn push_annotation(out: &mut Vec<NodeRef>, annotation: &Annotation) {
    match &annotation.args {
        AnnotationArgs::None => {}
        AnnotationArgs::Single(value) => push_element_value(out, value),
        AnnotationArgs::Named(pairs) => {
            for (_, value) in pairs {
                push_element_value(out, value);
            }
        }
    }
}

fn push_element_value(out: &mut Vec<NodeRef>, value: &ElementValue) {
    match value {
        ElementValue::Expr(e) => out.push(NodeRef::Expr(*e)),
        ElementValue::Annotation(nested) => push_annotation(out, &nested.node),
        ElementValue::Array(items) => {
            for item in items {
                push_element_value(out, item);
            }
        }
    }
}

fn push_type_params(out: &mut Vec<NodeRef>, params: &[TypeParam]) {
    for param in params {
        out.extend(param.bounds.iter().map(|&t| NodeRef::Type(t)));
    }
}
