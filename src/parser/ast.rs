use std::marker::PhantomData;
use std::ops::Index;

use crate::span::{Span, Spanned};

pub type Ident = Spanned<String>;

/// A dotted name such as `java.util.List`.
pub type QualifiedName = Vec<Ident>;

pub fn dotted(name: &[Ident]) -> String {
    name.iter().map(|s| s.node.as_str()).collect::<Vec<_>>().join(".")
}

pub trait ArenaId: Copy {
    fn from_raw(raw: u32) -> Self;
    fn raw(self) -> u32;
}

macro_rules! arena_id {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(u32);

            impl ArenaId for $name {
                fn from_raw(raw: u32) -> Self {
                    Self(raw)
                }

                fn raw(self) -> u32 {
                    self.0
                }
            }
        )*
    };
}

arena_id!(DeclId, MemberId, StmtId, ExprId, TypeId);

/// Append-only storage for one node category.
#[derive(Debug, Clone, PartialEq)]
pub struct Arena<I, T> {
    items: Vec<Spanned<T>>,
    _id: PhantomData<I>,
}

impl<I, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self { items: Vec::new(), _id: PhantomData }
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    pub fn alloc(&mut self, node: T, span: Span) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(Spanned::new(node, span));
        id
    }

    pub fn get(&self, id: I) -> Option<&Spanned<T>> {
        self.items.get(id.raw() as usize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &Spanned<T>)> {
        self.items.iter().enumerate().map(|(i, item)| (I::from_raw(i as u32), item))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Spanned<T>> {
        self.items.iter_mut()
    }

    /// Drop every node allocated after the arena held `len` nodes.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = Spanned<T>;

    fn index(&self, id: I) -> &Spanned<T> {
        &self.items[id.raw() as usize]
    }
}

/// One parsed source file. Every node lives in one of the arenas and is dropped
/// together with the `Ast`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ast {
    pub unit: CompilationUnit,
    pub decls: Arena<DeclId, TypeDecl>,
    pub members: Arena<MemberId, Member>,
    pub stmts: Arena<StmtId, Stmt>,
    pub exprs: Arena<ExprId, Expr>,
    pub types: Arena<TypeId, TypeNode>,
}

impl Ast {
    pub fn decl(&self, id: DeclId) -> &Spanned<TypeDecl> {
        &self.decls[id]
    }

    pub fn member(&self, id: MemberId) -> &Spanned<Member> {
        &self.members[id]
    }

    pub fn stmt(&self, id: StmtId) -> &Spanned<Stmt> {
        &self.stmts[id]
    }

    pub fn expr(&self, id: ExprId) -> &Spanned<Expr> {
        &self.exprs[id]
    }

    pub fn ty(&self, id: TypeId) -> &Spanned<TypeNode> {
        &self.types[id]
    }

    /// Top-level type declarations in source order.
    pub fn top_level(&self) -> impl Iterator<Item = &Spanned<TypeDecl>> {
        self.unit.types.iter().map(|&id| self.decl(id))
    }
}

// ---- Declarations ----

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub package: Option<Spanned<PackageDecl>>,
    pub imports: Vec<Spanned<ImportDecl>>,
    pub types: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageDecl {
    pub annotations: Vec<Spanned<Annotation>>,
    pub name: QualifiedName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub is_static: bool,
    pub path: QualifiedName,
    /// `import a.b.*;`
    pub wildcard: bool,
}

impl ImportDecl {
    pub fn full_path(&self) -> String {
        dotted(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeDeclKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeDeclKind::Class => "class",
            TypeDeclKind::Interface => "interface",
            TypeDeclKind::Enum => "enum",
            TypeDeclKind::Annotation => "@interface",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub modifiers: ModifierSet,
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    /// For classes at most one entry. Interfaces may extend several.
    pub extends: Vec<TypeId>,
    pub implements: Vec<TypeId>,
    pub enum_constants: Vec<Spanned<EnumConstant>>,
    pub members: Vec<MemberId>,
    pub doc: Option<Span>,
}

impl TypeDecl {
    pub fn superclass(&self) -> Option<TypeId> {
        match self.kind {
            TypeDeclKind::Class => self.extends.first().copied(),
            _ => None,
        }
    }

    /// Interfaces implemented by a class or enum, or extended by an interface.
    pub fn interfaces(&self) -> &[TypeId] {
        match self.kind {
            TypeDeclKind::Interface => &self.extends,
            _ => &self.implements,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Ident,
    pub bounds: Vec<TypeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub annotations: Vec<Spanned<Annotation>>,
    pub name: Ident,
    /// `None` when the constant has no parenthesized argument list.
    pub args: Option<Vec<ExprId>>,
    pub body: Option<Vec<MemberId>>,
    pub doc: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Initializer(Initializer),
    Type(DeclId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub modifiers: ModifierSet,
    pub ty: TypeId,
    pub declarators: Vec<Spanned<VarDeclarator>>,
    pub doc: Option<Span>,
}

/// `name[] = init` within a field or local variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: Ident,
    /// Array dimensions written after the name (`int x[]`).
    pub dims: u32,
    pub init: Option<ExprId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: ModifierSet,
    pub type_params: Vec<TypeParam>,
    /// `None` for constructors.
    pub return_type: Option<TypeId>,
    pub name: Ident,
    pub params: Vec<Spanned<Param>>,
    pub throws: Vec<TypeId>,
    /// `None` for abstract, interface and native methods.
    pub body: Option<StmtId>,
    /// Annotation element default (`String value() default "";`).
    pub default_value: Option<ElementValue>,
    pub doc: Option<Span>,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub modifiers: ModifierSet,
    pub ty: TypeId,
    pub varargs: bool,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    pub is_static: bool,
    pub body: StmtId,
}

// ---- Modifiers and annotations ----

/// Keyword modifiers. Declaration order is the canonical print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModifierSet {
    /// Keywords in source order.
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Spanned<Annotation>>,
}

impl ModifierSet {
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.annotations.is_empty()
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Find an annotation by simple or fully qualified name.
    pub fn annotation(&self, name: &str) -> Option<&Spanned<Annotation>> {
        self.annotations.iter().find(|a| {
            a.node.simple_name() == name || a.node.qualified_name() == name
        })
    }

    /// Keywords in canonical order, duplicates removed.
    pub fn canonical(&self) -> Vec<Modifier> {
        let mut sorted = self.modifiers.clone();
        sorted.sort();
        sorted.dedup();
        sorted
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: QualifiedName,
    pub args: AnnotationArgs,
}

impl Annotation {
    pub fn simple_name(&self) -> &str {
        self.name.last().map(|s| s.node.as_str()).unwrap_or("")
    }

    pub fn qualified_name(&self) -> String {
        dotted(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArgs {
    None,
    Single(ElementValue),
    Named(Vec<(Ident, ElementValue)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Expr(ExprId),
    Annotation(Box<Spanned<Annotation>>),
    Array(Vec<ElementValue>),
}

// ---- Statements ----

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Vec<StmtId>),
    LocalVar(LocalVarDecl),
    LocalClass(DeclId),
    Expr(ExprId),
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    SwitchClassic {
        selector: ExprId,
        cases: Vec<Spanned<ClassicCase>>,
    },
    SwitchArrow {
        selector: ExprId,
        cases: Vec<Spanned<ArrowCase>>,
    },
    For {
        init: Vec<StmtId>,
        cond: Option<ExprId>,
        update: Vec<ExprId>,
        body: StmtId,
    },
    ForEach {
        modifiers: ModifierSet,
        ty: TypeId,
        name: Ident,
        iterable: ExprId,
        body: StmtId,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    DoWhile {
        body: StmtId,
        cond: ExprId,
    },
    Try {
        resources: Vec<Spanned<Resource>>,
        body: StmtId,
        catches: Vec<Spanned<CatchClause>>,
        finally: Option<StmtId>,
    },
    Return(Option<ExprId>),
    Break(Option<Ident>),
    Continue(Option<Ident>),
    Throw(ExprId),
    Assert {
        cond: ExprId,
        message: Option<ExprId>,
    },
    Labeled {
        label: Ident,
        body: StmtId,
    },
    Synchronized {
        lock: ExprId,
        body: StmtId,
    },
    Yield(ExprId),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVarDecl {
    pub modifiers: ModifierSet,
    pub ty: TypeId,
    pub declarators: Vec<Spanned<VarDeclarator>>,
}

/// `case A, B:` followed by statements. Empty `labels` means `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicCase {
    pub labels: Vec<ExprId>,
    pub body: Vec<StmtId>,
}

impl ClassicCase {
    pub fn is_default(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether control can run off the end of this case into the next one.
    pub fn falls_through(&self, ast: &Ast) -> bool {
        match self.body.last() {
            None => true,
            Some(&last) => !completes_abruptly(ast, last),
        }
    }
}

fn completes_abruptly(ast: &Ast, stmt: StmtId) -> bool {
    match &ast.stmt(stmt).node {
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Return(_) | Stmt::Throw(_) | Stmt::Yield(_) => {
            true
        }
        Stmt::Block(stmts) => stmts.last().is_some_and(|&s| completes_abruptly(ast, s)),
        _ => false,
    }
}

/// `case A, B -> body`. Empty `labels` means `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowCase {
    pub labels: Vec<ExprId>,
    pub body: ArrowBody,
}

impl ArrowCase {
    pub fn is_default(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(ExprId),
    Block(StmtId),
    Throw(StmtId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwitchBody {
    Classic(Vec<Spanned<ClassicCase>>),
    Arrow(Vec<Spanned<ArrowCase>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub modifiers: ModifierSet,
    /// One entry per alternative of a multi-catch.
    pub types: Vec<TypeId>,
    pub name: Ident,
    pub body: StmtId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Decl {
        modifiers: ModifierSet,
        ty: TypeId,
        name: Ident,
        init: ExprId,
    },
    Expr(ExprId),
}

// ---- Expressions ----

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literals keep their source text.
    Int(String),
    Long(String),
    Float(String),
    Double(String),
    /// Character and string literals hold the decoded value.
    Char(String),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::UnsignedShiftRight => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    pub fn is_relational(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::ShiftLeft => "<<=",
            AssignOp::ShiftRight => ">>=",
            AssignOp::UnsignedShiftRight => ">>>=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Name(Ident),
    This,
    Super,
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Ternary {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    InstanceOf {
        expr: ExprId,
        ty: TypeId,
        /// Pattern binding (`x instanceof String s`).
        binding: Option<Ident>,
        /// `final` written before the pattern type.
        is_final: bool,
    },
    Cast {
        ty: TypeId,
        expr: ExprId,
    },
    /// `target.<T>name(args)`. Explicit constructor calls use the names `this` and `super`.
    MethodCall {
        target: Option<ExprId>,
        type_args: Vec<TypeId>,
        name: Ident,
        args: Vec<ExprId>,
    },
    FieldAccess {
        target: ExprId,
        name: Ident,
    },
    ArrayAccess {
        array: ExprId,
        index: ExprId,
    },
    ArrayInit(Vec<ExprId>),
    Lambda {
        params: LambdaParams,
        body: LambdaBody,
    },
    /// `target::name`, with `new` for constructor references.
    MethodRef {
        target: MethodRefTarget,
        type_args: Vec<TypeId>,
        name: Ident,
    },
    New {
        ty: TypeId,
        args: Vec<ExprId>,
        body: Option<Vec<MemberId>>,
    },
    NewArray {
        element: TypeId,
        dims: Vec<ExprId>,
        /// Trailing `[]` pairs without a length.
        extra_dims: u32,
        init: Option<ExprId>,
    },
    ClassLiteral(TypeId),
    Switch {
        selector: ExprId,
        body: SwitchBody,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaParams {
    /// `x -> ..` or `(x, y) -> ..`
    Inferred(Vec<Ident>),
    Typed(Vec<Spanned<Param>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    Expr(ExprId),
    Block(StmtId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MethodRefTarget {
    Expr(ExprId),
    Type(TypeId),
}

// ---- Types ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }
}

/// The `java.lang` wrapper classes of the primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxedType {
    Boolean,
    Byte,
    Character,
    Short,
    Integer,
    Long,
    Float,
    Double,
}

impl BoxedType {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Boolean" => BoxedType::Boolean,
            "Byte" => BoxedType::Byte,
            "Character" => BoxedType::Character,
            "Short" => BoxedType::Short,
            "Integer" => BoxedType::Integer,
            "Long" => BoxedType::Long,
            "Float" => BoxedType::Float,
            "Double" => BoxedType::Double,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BoxedType::Boolean => "Boolean",
            BoxedType::Byte => "Byte",
            BoxedType::Character => "Character",
            BoxedType::Short => "Short",
            BoxedType::Integer => "Integer",
            BoxedType::Long => "Long",
            BoxedType::Float => "Float",
            BoxedType::Double => "Double",
        }
    }

    pub fn unboxed(self) -> PrimitiveType {
        match self {
            BoxedType::Boolean => PrimitiveType::Boolean,
            BoxedType::Byte => PrimitiveType::Byte,
            BoxedType::Character => PrimitiveType::Char,
            BoxedType::Short => PrimitiveType::Short,
            BoxedType::Integer => PrimitiveType::Int,
            BoxedType::Long => PrimitiveType::Long,
            BoxedType::Float => PrimitiveType::Float,
            BoxedType::Double => PrimitiveType::Double,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardBound {
    Extends,
    Super,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Primitive(PrimitiveType),
    Boxed(BoxedType),
    Named(QualifiedName),
    /// `raw<args>`. Empty `args` is the diamond `<>`.
    Generic {
        raw: TypeId,
        args: Vec<TypeId>,
    },
    Array {
        element: TypeId,
    },
    Wildcard {
        bound: Option<(WildcardBound, TypeId)>,
    },
}

// ---- Uniform node access ----

/// Reference to any node. Nodes stored inline in their parent are addressed
/// by the parent and their position in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    Decl(DeclId),
    Member(MemberId),
    Stmt(StmtId),
    Expr(ExprId),
    Type(TypeId),
    /// The `package` clause of the compilation unit.
    Package,
    Import(u32),
    EnumConstant(DeclId, u32),
    /// Parameter of a method (`Owner::Member`) or typed lambda (`Owner::Expr`).
    Param(Owner, u32),
    /// Declarator of a field (`Owner::Member`) or local variable (`Owner::Stmt`).
    Declarator(Owner, u32),
    Resource(StmtId, u32),
    Catch(StmtId, u32),
    /// Case of a switch statement (`Owner::Stmt`) or expression (`Owner::Expr`).
    Case(Owner, u32),
}

/// Arena node holding an inline list of parameters, declarators or cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Owner {
    Member(MemberId),
    Stmt(StmtId),
    Expr(ExprId),
}

/// Tag of a node, one per AST variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    ClassDecl,
    InterfaceDecl,
    EnumDecl,
    AnnotationDecl,
    FieldDecl,
    MethodDecl,
    ConstructorDecl,
    Initializer,
    MemberType,
    Block,
    LocalVarDecl,
    LocalClass,
    ExpressionStmt,
    If,
    SwitchClassic,
    SwitchArrow,
    For,
    ForEach,
    While,
    DoWhile,
    Try,
    Return,
    Break,
    Continue,
    Throw,
    Assert,
    Labeled,
    Synchronized,
    Yield,
    Empty,
    Literal,
    Name,
    This,
    Super,
    Binary,
    Assign,
    Unary,
    Ternary,
    InstanceOf,
    Cast,
    MethodCall,
    FieldAccess,
    ArrayAccess,
    ArrayInit,
    Lambda,
    MethodRef,
    NewObject,
    NewArray,
    ClassLiteral,
    SwitchExpr,
    PrimitiveType,
    BoxedType,
    NamedType,
    GenericType,
    ArrayType,
    WildcardType,
    Package,
    Import,
    EnumConstant,
    Param,
    VarDeclarator,
    Resource,
    CatchClause,
    ClassicCase,
    ArrowCase,
}

pub(crate) enum CaseList<'a> {
    Classic(&'a [Spanned<ClassicCase>]),
    Arrow(&'a [Spanned<ArrowCase>]),
}

impl Ast {
    /// Parameters owned by `owner`; empty when it has none.
    pub fn params_of(&self, owner: Owner) -> &[Spanned<Param>] {
        match owner {
            Owner::Member(id) => match &self.member(id).node {
                Member::Method(method) => &method.params,
                _ => &[],
            },
            Owner::Expr(id) => match &self.expr(id).node {
                Expr::Lambda { params: LambdaParams::Typed(params), .. } => params,
                _ => &[],
            },
            Owner::Stmt(_) => &[],
        }
    }

    /// Declarators owned by `owner`; empty when it has none.
    pub fn declarators_of(&self, owner: Owner) -> &[Spanned<VarDeclarator>] {
        match owner {
            Owner::Member(id) => match &self.member(id).node {
                Member::Field(field) => &field.declarators,
                _ => &[],
            },
            Owner::Stmt(id) => match &self.stmt(id).node {
                Stmt::LocalVar(decl) => &decl.declarators,
                _ => &[],
            },
            Owner::Expr(_) => &[],
        }
    }

    pub(crate) fn cases_of(&self, owner: Owner) -> CaseList<'_> {
        match owner {
            Owner::Stmt(id) => match &self.stmt(id).node {
                Stmt::SwitchClassic { cases, .. } => CaseList::Classic(cases),
                Stmt::SwitchArrow { cases, .. } => CaseList::Arrow(cases),
                _ => CaseList::Classic(&[]),
            },
            Owner::Expr(id) => match &self.expr(id).node {
                Expr::Switch { body: SwitchBody::Classic(cases), .. } => CaseList::Classic(cases),
                Expr::Switch { body: SwitchBody::Arrow(cases), .. } => CaseList::Arrow(cases),
                _ => CaseList::Classic(&[]),
            },
            Owner::Member(_) => CaseList::Classic(&[]),
        }
    }

    pub(crate) fn try_parts(&self, id: StmtId) -> (&[Spanned<Resource>], &[Spanned<CatchClause>]) {
        match &self.stmt(id).node {
            Stmt::Try { resources, catches, .. } => (resources.as_slice(), catches.as_slice()),
            _ => (&[], &[]),
        }
    }

    /// Source span of `node`.
    ///
    /// Panics when `node` does not name a node of this tree, like arena indexing.
    pub fn span(&self, node: NodeRef) -> Span {
        match node {
            NodeRef::Decl(id) => self.decl(id).span,
            NodeRef::Member(id) => self.member(id).span,
            NodeRef::Stmt(id) => self.stmt(id).span,
            NodeRef::Expr(id) => self.expr(id).span,
            NodeRef::Type(id) => self.ty(id).span,
            NodeRef::Package => match &self.unit.package {
                Some(package) => package.span,
                None => panic!("compilation unit has no package clause"),
            },
            NodeRef::Import(i) => self.unit.imports[i as usize].span,
            NodeRef::EnumConstant(decl, i) => self.decl(decl).node.enum_constants[i as usize].span,
            NodeRef::Param(owner, i) => self.params_of(owner)[i as usize].span,
            NodeRef::Declarator(owner, i) => self.declarators_of(owner)[i as usize].span,
            NodeRef::Resource(id, i) => self.try_parts(id).0[i as usize].span,
            NodeRef::Catch(id, i) => self.try_parts(id).1[i as usize].span,
            NodeRef::Case(owner, i) => match self.cases_of(owner) {
                CaseList::Classic(cases) => cases[i as usize].span,
                CaseList::Arrow(cases) => cases[i as usize].span,
            },
        }
    }

    pub fn kind(&self, node: NodeRef) -> NodeKind {
        match node {
            NodeRef::Decl(id) => match self.decl(id).node.kind {
                TypeDeclKind::Class => NodeKind::ClassDecl,
                TypeDeclKind::Interface => NodeKind::InterfaceDecl,
                TypeDeclKind::Enum => NodeKind::EnumDecl,
                TypeDeclKind::Annotation => NodeKind::AnnotationDecl,
            },
            NodeRef::Member(id) => match &self.member(id).node {
                Member::Field(_) => NodeKind::FieldDecl,
                Member::Method(m) if m.is_constructor() => NodeKind::ConstructorDecl,
                Member::Method(_) => NodeKind::MethodDecl,
                Member::Initializer(_) => NodeKind::Initializer,
                Member::Type(_) => NodeKind::MemberType,
            },
            NodeRef::Stmt(id) => match &self.stmt(id).node {
                Stmt::Block(_) => NodeKind::Block,
                Stmt::LocalVar(_) => NodeKind::LocalVarDecl,
                Stmt::LocalClass(_) => NodeKind::LocalClass,
                Stmt::Expr(_) => NodeKind::ExpressionStmt,
                Stmt::If { .. } => NodeKind::If,
                Stmt::SwitchClassic { .. } => NodeKind::SwitchClassic,
                Stmt::SwitchArrow { .. } => NodeKind::SwitchArrow,
                Stmt::For { .. } => NodeKind::For,
                Stmt::ForEach { .. } => NodeKind::ForEach,
                Stmt::While { .. } => NodeKind::While,
                Stmt::DoWhile { .. } => NodeKind::DoWhile,
                Stmt::Try { .. } => NodeKind::Try,
                Stmt::Return(_) => NodeKind::Return,
                Stmt::Break(_) => NodeKind::Break,
                Stmt::Continue(_) => NodeKind::Continue,
                Stmt::Throw(_) => NodeKind::Throw,
                Stmt::Assert { .. } => NodeKind::Assert,
                Stmt::Labeled { .. } => NodeKind::Labeled,
                Stmt::Synchronized { .. } => NodeKind::Synchronized,
                Stmt::Yield(_) => NodeKind::Yield,
                Stmt::Empty => NodeKind::Empty,
            },
            NodeRef::Expr(id) => match &self.expr(id).node {
                Expr::Literal(_) => NodeKind::Literal,
                Expr::Name(_) => NodeKind::Name,
                Expr::This => NodeKind::This,
                Expr::Super => NodeKind::Super,
                Expr::Binary { .. } => NodeKind::Binary,
                Expr::Assign { .. } => NodeKind::Assign,
                Expr::Unary { .. } => NodeKind::Unary,
                Expr::Ternary { .. } => NodeKind::Ternary,
                Expr::InstanceOf { .. } => NodeKind::InstanceOf,
                Expr::Cast { .. } => NodeKind::Cast,
                Expr::MethodCall { .. } => NodeKind::MethodCall,
                Expr::FieldAccess { .. } => NodeKind::FieldAccess,
                Expr::ArrayAccess { .. } => NodeKind::ArrayAccess,
                Expr::ArrayInit(_) => NodeKind::ArrayInit,
                Expr::Lambda { .. } => NodeKind::Lambda,
                Expr::MethodRef { .. } => NodeKind::MethodRef,
                Expr::New { .. } => NodeKind::NewObject,
                Expr::NewArray { .. } => NodeKind::NewArray,
                Expr::ClassLiteral(_) => NodeKind::ClassLiteral,
                Expr::Switch { .. } => NodeKind::SwitchExpr,
            },
            NodeRef::Type(id) => match &self.ty(id).node {
                TypeNode::Primitive(_) => NodeKind::PrimitiveType,
                TypeNode::Boxed(_) => NodeKind::BoxedType,
                TypeNode::Named(_) => NodeKind::NamedType,
                TypeNode::Generic { .. } => NodeKind::GenericType,
                TypeNode::Array { .. } => NodeKind::ArrayType,
                TypeNode::Wildcard { .. } => NodeKind::WildcardType,
            },
            NodeRef::Package => NodeKind::Package,
            NodeRef::Import(_) => NodeKind::Import,
            NodeRef::EnumConstant(..) => NodeKind::EnumConstant,
            NodeRef::Param(..) => NodeKind::Param,
            NodeRef::Declarator(..) => NodeKind::VarDeclarator,
            NodeRef::Resource(..) => NodeKind::Resource,
            NodeRef::Catch(..) => NodeKind::CatchClause,
            NodeRef::Case(owner, _) => match self.cases_of(owner) {
                CaseList::Classic(_) => NodeKind::ClassicCase,
                CaseList::Arrow(_) => NodeKind::ArrowCase,
            },
        }
    }
}
