//! Declaration outline of a compilation unit: the package, its imports, and for
//! every type its header, fields, methods and nested types. Bodies are skipped.

use std::fmt;

use serde::Serialize;

use crate::parser::ast::*;
use crate::pretty::{annotation_to_string, type_to_string};
use crate::span::{Span, Spanned};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub package: Option<String>,
    pub imports: Vec<ImportOutline>,
    pub types: Vec<TypeOutline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutline {
    pub path: String,
    pub is_static: bool,
    pub wildcard: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    fn of(modifiers: &ModifierSet, implicitly_public: bool) -> Self {
        if modifiers.has(Modifier::Public) || implicitly_public {
            Visibility::Public
        } else if modifiers.has(Modifier::Protected) {
            Visibility::Protected
        } else if modifiers.has(Modifier::Private) {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Package => "package",
            Visibility::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeOutline {
    pub kind: &'static str,
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub annotations: Vec<String>,
    pub type_params: Vec<String>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub enum_constants: Vec<String>,
    pub fields: Vec<FieldOutline>,
    pub methods: Vec<MethodOutline>,
    pub nested: Vec<TypeOutline>,
    pub has_doc: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOutline {
    pub ty: String,
    pub names: Vec<String>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodOutline {
    pub name: String,
    /// `<T> R name(A a, B... b) throws E`, without modifiers.
    pub signature: String,
    pub visibility: Visibility,
    pub is_constructor: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    pub has_body: bool,
    pub annotations: Vec<String>,
}

pub fn outline(ast: &Ast) -> Outline {
    Outline {
        package: ast.unit.package.as_ref().map(|p| dotted(&p.node.name)),
        imports: ast
            .unit
            .imports
            .iter()
            .map(|i| ImportOutline {
                path: i.node.full_path(),
                is_static: i.node.is_static,
                wildcard: i.node.wildcard,
            })
            .collect(),
        types: ast.unit.types.iter().map(|&d| type_outline(ast, d, false, false)).collect(),
    }
}

fn type_outline(ast: &Ast, id: DeclId, nested: bool, in_interface: bool) -> TypeOutline {
    let spanned = ast.decl(id);
    let decl = &spanned.node;
    let interface_like = matches!(decl.kind, TypeDeclKind::Interface | TypeDeclKind::Annotation);
    let m = &decl.modifiers;

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    let mut members = Vec::new();
    for &member in &decl.members {
        match &ast.member(member).node {
            Member::Field(field) => fields.push(FieldOutline {
                ty: type_to_string(ast, field.ty),
                names: field.declarators.iter().map(|d| d.node.name.node.clone()).collect(),
                visibility: Visibility::of(&field.modifiers, interface_like),
                is_static: interface_like || field.modifiers.has(Modifier::Static),
                is_final: interface_like || field.modifiers.has(Modifier::Final),
            }),
            Member::Method(method) => methods.push(method_outline(ast, method, interface_like)),
            Member::Initializer(_) => {}
            Member::Type(inner) => members.push(type_outline(ast, *inner, true, interface_like)),
        }
    }

    TypeOutline {
        kind: decl.kind.keyword(),
        name: decl.name.node.clone(),
        visibility: Visibility::of(m, in_interface),
        // Member types of interfaces and nested enums are implicitly static.
        is_static: m.has(Modifier::Static)
            || in_interface
            || (nested && decl.kind == TypeDeclKind::Enum),
        is_abstract: m.has(Modifier::Abstract) || interface_like,
        is_final: m.has(Modifier::Final),
        annotations: m.annotations.iter().map(|a| annotation_to_string(ast, &a.node)).collect(),
        type_params: decl.type_params.iter().map(|p| type_param_string(ast, p)).collect(),
        superclass: decl.superclass().map(|t| type_to_string(ast, t)),
        interfaces: decl.interfaces().iter().map(|&t| type_to_string(ast, t)).collect(),
        enum_constants: decl.enum_constants.iter().map(|c| c.node.name.node.clone()).collect(),
        fields,
        methods,
        nested: members,
        has_doc: decl.doc.is_some(),
        span: spanned.span,
    }
}

fn method_outline(ast: &Ast, method: &MethodDecl, in_interface: bool) -> MethodOutline {
    let m = &method.modifiers;
    let mut signature = String::new();
    if !method.type_params.is_empty() {
        let params: Vec<String> = method.type_params.iter().map(|p| type_param_string(ast, p)).collect();
        signature.push_str(&format!("<{}> ", params.join(", ")));
    }
    if let Some(ret) = method.return_type {
        signature.push_str(&type_to_string(ast, ret));
        signature.push(' ');
    }
    signature.push_str(&method.name.node);
    let params: Vec<String> = method
        .params
        .iter()
        .map(|Spanned { node: p, .. }| {
            let dots = if p.varargs { "..." } else { "" };
            format!("{}{dots} {}", type_to_string(ast, p.ty), p.name.node)
        })
        .collect();
    signature.push_str(&format!("({})", params.join(", ")));
    if !method.throws.is_empty() {
        let throws: Vec<String> = method.throws.iter().map(|&t| type_to_string(ast, t)).collect();
        signature.push_str(&format!(" throws {}", throws.join(", ")));
    }

    let has_body = method.body.is_some();
    MethodOutline {
        name: method.name.node.clone(),
        signature,
        visibility: Visibility::of(m, in_interface && !m.has(Modifier::Private)),
        is_constructor: method.is_constructor(),
        is_static: m.has(Modifier::Static),
        is_abstract: m.has(Modifier::Abstract) || (in_interface && !has_body),
        has_body,
        annotations: m.annotations.iter().map(|a| annotation_to_string(ast, &a.node)).collect(),
    }
}

fn type_param_string(ast: &Ast, param: &TypeParam) -> String {
    if param.bounds.is_empty() {
        return param.name.node.clone();
    }
    let bounds: Vec<String> = param.bounds.iter().map(|&b| type_to_string(ast, b)).collect();
    format!("{} extends {}", param.name.node, bounds.join(" & "))
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(package) = &self.package {
            writeln!(f, "package {package}")?;
        }
        for import in &self.imports {
            let kw = if import.is_static { "import static" } else { "import" };
            let star = if import.wildcard { ".*" } else { "" };
            writeln!(f, "{kw} {}{star}", import.path)?;
        }
        for ty in &self.types {
            ty.write(f, 0)?;
        }
        Ok(())
    }
}

impl TypeOutline {
    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        write!(f, "{pad}{} {} {}", self.visibility.as_str(), self.kind, self.name)?;
        if !self.type_params.is_empty() {
            write!(f, "<{}>", self.type_params.join(", "))?;
        }
        if let Some(sup) = &self.superclass {
            write!(f, " extends {sup}")?;
        }
        if !self.interfaces.is_empty() {
            let kw = if self.kind == "interface" { "extends" } else { "implements" };
            write!(f, " {kw} {}", self.interfaces.join(", "))?;
        }
        writeln!(f)?;
        for annotation in &self.annotations {
            writeln!(f, "{pad}  {annotation}")?;
        }
        if !self.enum_constants.is_empty() {
            writeln!(f, "{pad}  constants {}", self.enum_constants.join(", "))?;
        }
        for field in &self.fields {
            writeln!(f, "{pad}  field {} {} {}", field.visibility.as_str(), field.ty, field.names.join(", "))?;
        }
        for method in &self.methods {
            let kind = if method.is_constructor { "constructor" } else { "method" };
            writeln!(f, "{pad}  {kind} {} {}", method.visibility.as_str(), method.signature)?;
        }
        for nested in &self.nested {
            nested.write(f, depth + 1)?;
        }
        Ok(())
    }
}
