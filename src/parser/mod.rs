pub mod ast;
mod expr;
mod types;

use std::time::Instant;

use thiserror::Error;

use crate::diagnostics::ParseError;
use crate::lexer::{Comment, CommentKind, Token, TokenKind};
use crate::span::{Span, Spanned};
use ast::*;

/// Nested statements, expressions and types deeper than this are rejected
/// instead of exhausting the stack.
const MAX_DEPTH: u32 = 256;

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Keep going after a syntax error, resynchronizing at the next statement
    /// or member boundary.
    pub recover: bool,
    pub deadline: Option<Instant>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseResult {
    pub ast: Ast,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("parse deadline exceeded")]
    Deadline,
}

/// Why a parse routine stopped early.
#[derive(Debug)]
pub(crate) enum Halt {
    Syntax(ParseError),
    Deadline,
}

impl From<ParseError> for Halt {
    fn from(err: ParseError) -> Self {
        Halt::Syntax(err)
    }
}

type PResult<T> = Result<T, Halt>;

/// Parse a token stream with default options: stop at the first error, no deadline.
pub fn parse(tokens: &[Token<'_>], source: &str) -> ParseResult {
    let mut parser = Parser::new(tokens, source, ParseOptions::default());
    // Without a deadline the parse cannot be interrupted.
    let _ = parser.parse_compilation_unit();
    parser.finish()
}

pub fn parse_with(
    tokens: &[Token<'_>],
    source: &str,
    options: &ParseOptions,
) -> Result<ParseResult, Interrupted> {
    let mut parser = Parser::new(tokens, source, options.clone());
    parser.parse_compilation_unit()?;
    Ok(parser.finish())
}

/// Attach each `/** */` comment to the type, enum constant or member declaration
/// that directly follows it, with no token in between.
pub fn attach_doc_comments(ast: &mut Ast, tokens: &[Token<'_>], comments: &[Comment]) {
    let docs: Vec<Span> =
        comments.iter().filter(|c| c.kind == CommentKind::Doc).map(|c| c.span).collect();
    if docs.is_empty() {
        return;
    }
    let doc_before = |start: usize| -> Option<Span> {
        let idx = tokens.partition_point(|t| t.span.start < start);
        let prev_end = if idx == 0 { 0 } else { tokens[idx - 1].span.end };
        docs.iter().rev().find(|d| d.end <= start && d.start >= prev_end).copied()
    };
    for decl in ast.decls.iter_mut() {
        decl.node.doc = doc_before(decl.span.start);
        for constant in &mut decl.node.enum_constants {
            constant.node.doc = doc_before(constant.span.start);
        }
    }
    for member in ast.members.iter_mut() {
        let start = member.span.start;
        match &mut member.node {
            Member::Field(field) => field.doc = doc_before(start),
            Member::Method(method) => method.doc = doc_before(start),
            Member::Initializer(_) | Member::Type(_) => {}
        }
    }
}

/// Position and arena sizes, for speculative parses that may be undone.
#[derive(Clone, Copy)]
struct Checkpoint {
    pos: usize,
    decls: usize,
    members: usize,
    stmts: usize,
    exprs: usize,
    types: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SwitchForm {
    Classic,
    Arrow,
}

pub(crate) struct Parser<'a> {
    tokens: &'a [Token<'a>],
    source: &'a str,
    pos: usize,
    ast: Ast,
    errors: Vec<ParseError>,
    options: ParseOptions,
    depth: u32,
    ticks: u32,
    /// Set while parsing `case` labels, where `x -> ..` is a case arm.
    no_lambda: bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token<'a>], source: &'a str, options: ParseOptions) -> Self {
        Self {
            tokens,
            source,
            pos: 0,
            ast: Ast::default(),
            errors: Vec::new(),
            options,
            depth: 0,
            ticks: 0,
            no_lambda: false,
        }
    }

    pub(crate) fn finish(self) -> ParseResult {
        ParseResult { ast: self.ast, errors: self.errors }
    }

    // ---- Token access ----

    fn nth(&self, n: usize) -> Option<&'a Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn kind(&self) -> Option<&'a TokenKind> {
        self.nth(0).map(|t| &t.kind)
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.kind() == Some(kind)
    }

    fn at_nth(&self, n: usize, kind: &TokenKind) -> bool {
        self.nth(n).is_some_and(|t| t.kind == *kind)
    }

    fn kind_at(&self, index: usize) -> Option<&'a TokenKind> {
        self.tokens.get(index).map(|t| &t.kind)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> PResult<Span> {
        match self.nth(0) {
            Some(tok) if tok.kind == *kind => {
                self.pos += 1;
                Ok(tok.span)
            }
            _ => Err(self.error_expected([kind.to_string()])),
        }
    }

    fn expect_ident(&mut self) -> PResult<Ident> {
        match self.nth(0) {
            Some(tok) if tok.kind == TokenKind::Ident => {
                self.pos += 1;
                Ok(Spanned::new(tok.lexeme.to_string(), tok.span))
            }
            _ => Err(self.error_expected(["identifier"])),
        }
    }

    /// Start offset of the current token, or the end of the source.
    fn cur_start(&self) -> usize {
        self.nth(0).map_or(self.source.len(), |t| t.span.start)
    }

    fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(tok) => tok.span.end,
            None => 0,
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    fn error_expected<I, S>(&self, expected: I) -> Halt
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (found, span) = match self.nth(0) {
            Some(tok) => (format!("`{}`", tok.lexeme), tok.span),
            None => ("end of file".to_string(), Span::new(self.source.len(), self.source.len())),
        };
        Halt::Syntax(ParseError::new(expected, found, span))
    }

    // ---- Allocation and backtracking ----

    fn alloc_expr(&mut self, expr: Expr, start: usize) -> ExprId {
        let span = self.span_from(start);
        self.ast.exprs.alloc(expr, span)
    }

    fn alloc_stmt(&mut self, stmt: Stmt, start: usize) -> StmtId {
        let span = self.span_from(start);
        self.ast.stmts.alloc(stmt, span)
    }

    fn alloc_type(&mut self, ty: TypeNode, start: usize) -> TypeId {
        let span = self.span_from(start);
        self.ast.types.alloc(ty, span)
    }

    fn alloc_member(&mut self, member: Member, start: usize) -> MemberId {
        let span = self.span_from(start);
        self.ast.members.alloc(member, span)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            decls: self.ast.decls.len(),
            members: self.ast.members.len(),
            stmts: self.ast.stmts.len(),
            exprs: self.ast.exprs.len(),
            types: self.ast.types.len(),
        }
    }

    fn rewind(&mut self, cp: Checkpoint) {
        self.pos = cp.pos;
        self.ast.decls.truncate(cp.decls);
        self.ast.members.truncate(cp.members);
        self.ast.stmts.truncate(cp.stmts);
        self.ast.exprs.truncate(cp.exprs);
        self.ast.types.truncate(cp.types);
    }

    // ---- Limits ----

    fn check_deadline(&mut self) -> PResult<()> {
        if let Some(deadline) = self.options.deadline {
            self.ticks = self.ticks.wrapping_add(1);
            if self.ticks % 256 == 1 && Instant::now() >= deadline {
                return Err(Halt::Deadline);
            }
        }
        Ok(())
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_expected(["less deeply nested code"]));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ---- Error recovery ----

    /// Record a syntax error and skip to the next boundary when recovering;
    /// otherwise pass the failure up.
    fn recoverable<T>(&mut self, result: PResult<T>, start_pos: usize) -> PResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(Halt::Syntax(err)) if self.options.recover => {
                if self.errors.last() != Some(&err) {
                    self.errors.push(err);
                }
                self.synchronize();
                if self.pos == start_pos && !self.is_eof() {
                    self.pos += 1;
                }
                Ok(None)
            }
            Err(halt) => Err(halt),
        }
    }

    /// Skip past the next `;` at the current brace depth, past a brace-balanced
    /// block, or up to (not over) the `}` closing the enclosing block.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.tokens.get(self.pos) {
            match tok.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                TokenKind::Semi if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    // ---- Compilation unit ----

    fn parse_compilation_unit(&mut self) -> Result<(), Interrupted> {
        match self.compilation_unit() {
            Ok(()) => Ok(()),
            Err(Halt::Syntax(err)) => {
                self.errors.push(err);
                Ok(())
            }
            Err(Halt::Deadline) => Err(Interrupted::Deadline),
        }
    }

    fn compilation_unit(&mut self) -> PResult<()> {
        if self.at_package_decl() {
            let start = self.cur_start();
            let mut annotations = Vec::new();
            while self.at(&TokenKind::At) {
                annotations.push(self.annotation()?);
            }
            self.expect(&TokenKind::Package)?;
            let name = self.qualified_name()?;
            self.expect(&TokenKind::Semi)?;
            let span = self.span_from(start);
            self.ast.unit.package = Some(Spanned::new(PackageDecl { annotations, name }, span));
        }

        while self.at(&TokenKind::Import) {
            let start_pos = self.pos;
            let result = self.import_decl();
            if let Some(import) = self.recoverable(result, start_pos)? {
                self.ast.unit.imports.push(import);
            }
        }

        while !self.is_eof() {
            self.check_deadline()?;
            if self.eat(&TokenKind::Semi) {
                continue;
            }
            let start_pos = self.pos;
            let result = self.type_decl_with_modifiers();
            if let Some(id) = self.recoverable(result, start_pos)? {
                self.ast.unit.types.push(id);
            }
        }
        Ok(())
    }

    /// `package` possibly preceded by annotations.
    fn at_package_decl(&self) -> bool {
        let mut i = self.pos;
        loop {
            match self.kind_at(i) {
                Some(TokenKind::Package) => return true,
                Some(TokenKind::At) if self.kind_at(i + 1) != Some(&TokenKind::Interface) => {
                    i += 1;
                    while matches!(self.kind_at(i), Some(TokenKind::Ident | TokenKind::Dot)) {
                        i += 1;
                    }
                    if self.kind_at(i) == Some(&TokenKind::LParen) {
                        let mut depth = 0usize;
                        loop {
                            match self.kind_at(i) {
                                Some(TokenKind::LParen) => depth += 1,
                                Some(TokenKind::RParen) => {
                                    depth -= 1;
                                    if depth == 0 {
                                        break;
                                    }
                                }
                                None => return false,
                                _ => {}
                            }
                            i += 1;
                        }
                        i += 1;
                    }
                }
                _ => return false,
            }
        }
    }

    fn import_decl(&mut self) -> PResult<Spanned<ImportDecl>> {
        let start = self.cur_start();
        self.expect(&TokenKind::Import)?;
        let is_static = self.eat(&TokenKind::Static);
        let mut path = vec![self.expect_ident()?];
        let mut wildcard = false;
        while self.eat(&TokenKind::Dot) {
            if self.eat(&TokenKind::Star) {
                wildcard = true;
                break;
            }
            path.push(self.expect_ident()?);
        }
        self.expect(&TokenKind::Semi)?;
        Ok(Spanned::new(ImportDecl { is_static, path, wildcard }, self.span_from(start)))
    }

    // ---- Type declarations ----

    fn at_type_decl_keyword(&self) -> bool {
        match self.kind() {
            Some(TokenKind::Class | TokenKind::Interface | TokenKind::Enum) => true,
            Some(TokenKind::At) => self.at_nth(1, &TokenKind::Interface),
            _ => false,
        }
    }

    fn type_decl_with_modifiers(&mut self) -> PResult<DeclId> {
        let start = self.cur_start();
        let modifiers = self.modifiers()?;
        self.type_decl(modifiers, start)
    }

    fn type_decl(&mut self, modifiers: ModifierSet, start: usize) -> PResult<DeclId> {
        let kind = match self.kind() {
            Some(TokenKind::Class) => TypeDeclKind::Class,
            Some(TokenKind::Interface) => TypeDeclKind::Interface,
            Some(TokenKind::Enum) => TypeDeclKind::Enum,
            Some(TokenKind::At) if self.at_nth(1, &TokenKind::Interface) => {
                self.pos += 1;
                TypeDeclKind::Annotation
            }
            _ => return Err(self.error_expected(["class", "interface", "enum", "@interface"])),
        };
        self.pos += 1;
        let name = self.expect_ident()?;
        let type_params = if self.at(&TokenKind::Lt) { self.type_params()? } else { Vec::new() };

        let mut extends = Vec::new();
        let mut implements = Vec::new();
        match kind {
            TypeDeclKind::Class if self.eat(&TokenKind::Extends) => {
                extends.push(self.parse_type()?);
            }
            TypeDeclKind::Interface if self.eat(&TokenKind::Extends) => {
                extends = self.type_list()?;
            }
            _ => {}
        }
        if matches!(kind, TypeDeclKind::Class | TypeDeclKind::Enum) && self.eat(&TokenKind::Implements)
        {
            implements = self.type_list()?;
        }

        self.expect(&TokenKind::LBrace)?;
        let (enum_constants, members) = if kind == TypeDeclKind::Enum {
            self.enum_body()?
        } else {
            (Vec::new(), self.members_until_close()?)
        };

        let decl = TypeDecl {
            kind,
            modifiers,
            name,
            type_params,
            extends,
            implements,
            enum_constants,
            members,
            doc: None,
        };
        let span = self.span_from(start);
        Ok(self.ast.decls.alloc(decl, span))
    }

    /// Constants, then optional `;` and members. The opening `{` is already consumed.
    fn enum_body(&mut self) -> PResult<(Vec<Spanned<EnumConstant>>, Vec<MemberId>)> {
        let mut constants = Vec::new();
        while !self.at(&TokenKind::Semi) && !self.at(&TokenKind::RBrace) {
            constants.push(self.enum_constant()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let members = if self.eat(&TokenKind::Semi) {
            self.members_until_close()?
        } else {
            self.expect(&TokenKind::RBrace)?;
            Vec::new()
        };
        Ok((constants, members))
    }

    fn enum_constant(&mut self) -> PResult<Spanned<EnumConstant>> {
        let start = self.cur_start();
        let mut annotations = Vec::new();
        while self.at(&TokenKind::At) {
            annotations.push(self.annotation()?);
        }
        let name = self.expect_ident()?;
        let args = if self.at(&TokenKind::LParen) { Some(self.arguments()?) } else { None };
        let body = if self.at(&TokenKind::LBrace) { Some(self.class_body()?) } else { None };
        let constant = EnumConstant { annotations, name, args, body, doc: None };
        Ok(Spanned::new(constant, self.span_from(start)))
    }

    pub(crate) fn class_body(&mut self) -> PResult<Vec<MemberId>> {
        self.expect(&TokenKind::LBrace)?;
        self.members_until_close()
    }

    /// Members up to and including the closing `}`.
    fn members_until_close(&mut self) -> PResult<Vec<MemberId>> {
        let mut members = Vec::new();
        loop {
            self.check_deadline()?;
            match self.kind() {
                Some(TokenKind::RBrace) => {
                    self.pos += 1;
                    return Ok(members);
                }
                Some(TokenKind::Semi) => {
                    self.pos += 1;
                }
                None => return Err(self.error_expected(["}"])),
                Some(_) => {
                    let start_pos = self.pos;
                    let result = self.member();
                    if let Some(member) = self.recoverable(result, start_pos)? {
                        members.push(member);
                    }
                }
            }
        }
    }

    fn member(&mut self) -> PResult<MemberId> {
        let start = self.cur_start();
        if self.at(&TokenKind::LBrace) {
            let body = self.block()?;
            return Ok(self.alloc_member(Member::Initializer(Initializer { is_static: false, body }), start));
        }
        if self.at(&TokenKind::Static) && self.at_nth(1, &TokenKind::LBrace) {
            self.pos += 1;
            let body = self.block()?;
            return Ok(self.alloc_member(Member::Initializer(Initializer { is_static: true, body }), start));
        }

        let modifiers = self.modifiers()?;
        if self.at_type_decl_keyword() {
            let decl = self.type_decl(modifiers, start)?;
            return Ok(self.alloc_member(Member::Type(decl), start));
        }

        let type_params = if self.at(&TokenKind::Lt) { self.type_params()? } else { Vec::new() };

        // A name directly followed by `(` can only be a constructor.
        if self.at(&TokenKind::Ident) && self.at_nth(1, &TokenKind::LParen) {
            let name = self.expect_ident()?;
            let params = self.params()?;
            let throws = self.throws_clause()?;
            let body = Some(self.block()?);
            let method = MethodDecl {
                modifiers,
                type_params,
                return_type: None,
                name,
                params,
                throws,
                body,
                default_value: None,
                doc: None,
            };
            return Ok(self.alloc_member(Member::Method(method), start));
        }

        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        if self.at(&TokenKind::LParen) {
            let params = self.params()?;
            let throws = self.throws_clause()?;
            let default_value =
                if self.eat(&TokenKind::Default) { Some(self.element_value()?) } else { None };
            let body = if self.eat(&TokenKind::Semi) { None } else { Some(self.block()?) };
            let method = MethodDecl {
                modifiers,
                type_params,
                return_type: Some(ty),
                name,
                params,
                throws,
                body,
                default_value,
                doc: None,
            };
            return Ok(self.alloc_member(Member::Method(method), start));
        }

        if !type_params.is_empty() {
            return Err(self.error_expected(["("]));
        }
        let declarators = self.declarators_after(name)?;
        self.expect(&TokenKind::Semi)?;
        let field = FieldDecl { modifiers, ty, declarators, doc: None };
        Ok(self.alloc_member(Member::Field(field), start))
    }

    pub(crate) fn params(&mut self) -> PResult<Vec<Spanned<Param>>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            params.push(self.param()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn param(&mut self) -> PResult<Spanned<Param>> {
        let start = self.cur_start();
        let modifiers = self.modifiers()?;
        let ty_start = self.cur_start();
        let mut ty = self.parse_type()?;
        let varargs = self.eat(&TokenKind::Ellipsis);
        let name = self.expect_ident()?;
        // `String args[]` is `String[] args`.
        while self.at(&TokenKind::LBracket) && self.at_nth(1, &TokenKind::RBracket) {
            self.pos += 2;
            ty = self.alloc_type(TypeNode::Array { element: ty }, ty_start);
        }
        Ok(Spanned::new(Param { modifiers, ty, varargs, name }, self.span_from(start)))
    }

    fn throws_clause(&mut self) -> PResult<Vec<TypeId>> {
        if self.eat(&TokenKind::Throws) { self.type_list() } else { Ok(Vec::new()) }
    }

    fn type_list(&mut self) -> PResult<Vec<TypeId>> {
        let mut types = vec![self.parse_type()?];
        while self.eat(&TokenKind::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    /// Declarators of a field or local variable whose first name is already consumed.
    fn declarators_after(&mut self, first: Ident) -> PResult<Vec<Spanned<VarDeclarator>>> {
        let mut declarators = vec![self.declarator_rest(first)?];
        while self.eat(&TokenKind::Comma) {
            let name = self.expect_ident()?;
            declarators.push(self.declarator_rest(name)?);
        }
        Ok(declarators)
    }

    fn declarator_rest(&mut self, name: Ident) -> PResult<Spanned<VarDeclarator>> {
        let start = name.span.start;
        let mut dims = 0;
        while self.at(&TokenKind::LBracket) && self.at_nth(1, &TokenKind::RBracket) {
            self.pos += 2;
            dims += 1;
        }
        let init = if self.eat(&TokenKind::Eq) { Some(self.var_initializer()?) } else { None };
        Ok(Spanned::new(VarDeclarator { name, dims, init }, self.span_from(start)))
    }

    fn var_initializer(&mut self) -> PResult<ExprId> {
        if self.at(&TokenKind::LBrace) { self.array_initializer() } else { self.expr() }
    }

    // ---- Statements ----

    pub(crate) fn block(&mut self) -> PResult<StmtId> {
        let start = self.cur_start();
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            match self.kind() {
                Some(TokenKind::RBrace) => break,
                None => return Err(self.error_expected(["}"])),
                Some(_) => {
                    let start_pos = self.pos;
                    let result = self.statement();
                    if let Some(stmt) = self.recoverable(result, start_pos)? {
                        stmts.push(stmt);
                    }
                }
            }
        }
        self.pos += 1;
        Ok(self.alloc_stmt(Stmt::Block(stmts), start))
    }

    fn statement(&mut self) -> PResult<StmtId> {
        self.check_deadline()?;
        self.nested(Self::statement_inner)
    }

    fn statement_inner(&mut self) -> PResult<StmtId> {
        let start = self.cur_start();
        let Some(tok) = self.nth(0) else {
            return Err(self.error_expected(["statement"]));
        };
        match &tok.kind {
            TokenKind::LBrace => self.block(),
            TokenKind::Semi => {
                self.pos += 1;
                Ok(self.alloc_stmt(Stmt::Empty, start))
            }
            TokenKind::If => self.if_stmt(start),
            TokenKind::While => {
                self.pos += 1;
                let cond = self.paren_expr()?;
                let body = self.statement()?;
                Ok(self.alloc_stmt(Stmt::While { cond, body }, start))
            }
            TokenKind::Do => {
                self.pos += 1;
                let body = self.statement()?;
                self.expect(&TokenKind::While)?;
                let cond = self.paren_expr()?;
                self.expect(&TokenKind::Semi)?;
                Ok(self.alloc_stmt(Stmt::DoWhile { body, cond }, start))
            }
            TokenKind::For => self.for_stmt(start),
            TokenKind::Try => self.try_stmt(start),
            TokenKind::Switch => {
                self.pos += 1;
                let selector = self.paren_expr()?;
                let stmt = match self.switch_block()? {
                    SwitchBody::Classic(cases) => Stmt::SwitchClassic { selector, cases },
                    SwitchBody::Arrow(cases) => Stmt::SwitchArrow { selector, cases },
                };
                Ok(self.alloc_stmt(stmt, start))
            }
            TokenKind::Return => {
                self.pos += 1;
                let value = if self.at(&TokenKind::Semi) { None } else { Some(self.expr()?) };
                self.expect(&TokenKind::Semi)?;
                Ok(self.alloc_stmt(Stmt::Return(value), start))
            }
            TokenKind::Break | TokenKind::Continue => {
                let is_break = tok.kind == TokenKind::Break;
                self.pos += 1;
                let label =
                    if self.at(&TokenKind::Ident) { Some(self.expect_ident()?) } else { None };
                self.expect(&TokenKind::Semi)?;
                let stmt = if is_break { Stmt::Break(label) } else { Stmt::Continue(label) };
                Ok(self.alloc_stmt(stmt, start))
            }
            TokenKind::Throw => {
                self.pos += 1;
                let value = self.expr()?;
                self.expect(&TokenKind::Semi)?;
                Ok(self.alloc_stmt(Stmt::Throw(value), start))
            }
            TokenKind::Assert => {
                self.pos += 1;
                let cond = self.expr()?;
                let message = if self.eat(&TokenKind::Colon) { Some(self.expr()?) } else { None };
                self.expect(&TokenKind::Semi)?;
                Ok(self.alloc_stmt(Stmt::Assert { cond, message }, start))
            }
            TokenKind::Synchronized if self.at_nth(1, &TokenKind::LParen) => {
                self.pos += 1;
                let lock = self.paren_expr()?;
                let body = self.block()?;
                Ok(self.alloc_stmt(Stmt::Synchronized { lock, body }, start))
            }
            TokenKind::Final
            | TokenKind::Abstract
            | TokenKind::Strictfp
            | TokenKind::At
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Enum => {
                let modifiers = self.modifiers()?;
                if self.at_type_decl_keyword() {
                    let decl = self.type_decl(modifiers, start)?;
                    return Ok(self.alloc_stmt(Stmt::LocalClass(decl), start));
                }
                self.local_var_stmt(modifiers, start)
            }
            TokenKind::Ident if self.at_nth(1, &TokenKind::Colon) => {
                let label = self.expect_ident()?;
                self.pos += 1;
                let body = self.statement()?;
                Ok(self.alloc_stmt(Stmt::Labeled { label, body }, start))
            }
            TokenKind::Ident if tok.lexeme == "yield" && self.at_yield_stmt() => {
                self.pos += 1;
                let value = self.expr()?;
                self.expect(&TokenKind::Semi)?;
                Ok(self.alloc_stmt(Stmt::Yield(value), start))
            }
            _ if self.at_local_var_decl() => self.local_var_stmt(ModifierSet::default(), start),
            _ => {
                let value = self.expr()?;
                self.expect(&TokenKind::Semi)?;
                Ok(self.alloc_stmt(Stmt::Expr(value), start))
            }
        }
    }

    /// `yield` is a statement unless it is used as a plain name.
    fn at_yield_stmt(&self) -> bool {
        match self.nth(1).map(|t| &t.kind) {
            None => false,
            Some(next) => !matches!(
                next,
                TokenKind::Eq
                    | TokenKind::PlusEq
                    | TokenKind::MinusEq
                    | TokenKind::StarEq
                    | TokenKind::SlashEq
                    | TokenKind::PercentEq
                    | TokenKind::AmpEq
                    | TokenKind::PipeEq
                    | TokenKind::CaretEq
                    | TokenKind::ShlEq
                    | TokenKind::Dot
                    | TokenKind::LBracket
                    | TokenKind::PlusPlus
                    | TokenKind::MinusMinus
                    | TokenKind::Semi
                    | TokenKind::ColonColon
            ),
        }
    }

    fn local_var_stmt(&mut self, modifiers: ModifierSet, start: usize) -> PResult<StmtId> {
        let decl = self.local_var_decl(modifiers)?;
        self.expect(&TokenKind::Semi)?;
        Ok(self.alloc_stmt(Stmt::LocalVar(decl), start))
    }

    fn local_var_decl(&mut self, modifiers: ModifierSet) -> PResult<LocalVarDecl> {
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let declarators = self.declarators_after(name)?;
        Ok(LocalVarDecl { modifiers, ty, declarators })
    }

    /// A type shape followed by an identifier, scanned without consuming anything.
    fn at_local_var_decl(&self) -> bool {
        match self.scan_type(self.pos) {
            Some(end) => self.kind_at(end) == Some(&TokenKind::Ident),
            None => false,
        }
    }

    fn at_decl_start(&self) -> bool {
        matches!(self.kind(), Some(TokenKind::Final | TokenKind::At)) || self.at_local_var_decl()
    }

    fn scan_type(&self, mut i: usize) -> Option<usize> {
        match self.kind_at(i)? {
            kind if types::primitive_of(kind).is_some() => i += 1,
            TokenKind::Ident => {
                i += 1;
                loop {
                    if self.kind_at(i) == Some(&TokenKind::Lt) {
                        i = self.scan_type_args(i)?;
                    }
                    if self.kind_at(i) == Some(&TokenKind::Dot)
                        && self.kind_at(i + 1) == Some(&TokenKind::Ident)
                    {
                        i += 2;
                        continue;
                    }
                    break;
                }
            }
            _ => return None,
        }
        while self.kind_at(i) == Some(&TokenKind::LBracket)
            && self.kind_at(i + 1) == Some(&TokenKind::RBracket)
        {
            i += 2;
        }
        Some(i)
    }

    fn scan_type_args(&self, mut i: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            match self.kind_at(i)? {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                TokenKind::Ident
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::Question
                | TokenKind::Extends
                | TokenKind::Super
                | TokenKind::Amp
                | TokenKind::LBracket
                | TokenKind::RBracket => {}
                kind if types::primitive_of(kind).is_some() => {}
                _ => return None,
            }
            i += 1;
        }
    }

    fn paren_expr(&mut self) -> PResult<ExprId> {
        self.expect(&TokenKind::LParen)?;
        let value = self.expr()?;
        self.expect(&TokenKind::RParen)?;
        Ok(value)
    }

    fn if_stmt(&mut self, start: usize) -> PResult<StmtId> {
        self.expect(&TokenKind::If)?;
        let cond = self.paren_expr()?;
        let then_branch = self.statement()?;
        let else_branch = if self.eat(&TokenKind::Else) { Some(self.statement()?) } else { None };
        Ok(self.alloc_stmt(Stmt::If { cond, then_branch, else_branch }, start))
    }

    fn for_stmt(&mut self, start: usize) -> PResult<StmtId> {
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LParen)?;

        let mut init = Vec::new();
        if self.at_decl_start() {
            let decl_start = self.cur_start();
            let modifiers = self.modifiers()?;
            let ty = self.parse_type()?;
            let name = self.expect_ident()?;
            if self.eat(&TokenKind::Colon) {
                let iterable = self.expr()?;
                self.expect(&TokenKind::RParen)?;
                let body = self.statement()?;
                let stmt = Stmt::ForEach { modifiers, ty, name, iterable, body };
                return Ok(self.alloc_stmt(stmt, start));
            }
            let declarators = self.declarators_after(name)?;
            let decl = LocalVarDecl { modifiers, ty, declarators };
            init.push(self.alloc_stmt(Stmt::LocalVar(decl), decl_start));
        } else if !self.at(&TokenKind::Semi) {
            loop {
                let expr_start = self.cur_start();
                let value = self.expr()?;
                init.push(self.alloc_stmt(Stmt::Expr(value), expr_start));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::Semi)?;

        let cond = if self.at(&TokenKind::Semi) { None } else { Some(self.expr()?) };
        self.expect(&TokenKind::Semi)?;

        let mut update = Vec::new();
        if !self.at(&TokenKind::RParen) {
            loop {
                update.push(self.expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        let body = self.statement()?;
        Ok(self.alloc_stmt(Stmt::For { init, cond, update, body }, start))
    }

    fn try_stmt(&mut self, start: usize) -> PResult<StmtId> {
        self.expect(&TokenKind::Try)?;
        let mut resources = Vec::new();
        if self.eat(&TokenKind::LParen) {
            while !self.at(&TokenKind::RParen) {
                resources.push(self.resource()?);
                if !self.eat(&TokenKind::Semi) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen)?;
        }
        let body = self.block()?;

        let mut catches = Vec::new();
        while self.at(&TokenKind::Catch) {
            let catch_start = self.cur_start();
            self.pos += 1;
            self.expect(&TokenKind::LParen)?;
            let modifiers = self.modifiers()?;
            let mut types = vec![self.parse_type()?];
            while self.eat(&TokenKind::Pipe) {
                types.push(self.parse_type()?);
            }
            let name = self.expect_ident()?;
            self.expect(&TokenKind::RParen)?;
            let body = self.block()?;
            let clause = CatchClause { modifiers, types, name, body };
            catches.push(Spanned::new(clause, self.span_from(catch_start)));
        }

        let finally = if self.eat(&TokenKind::Finally) { Some(self.block()?) } else { None };
        if resources.is_empty() && catches.is_empty() && finally.is_none() {
            return Err(self.error_expected(["catch", "finally"]));
        }
        Ok(self.alloc_stmt(Stmt::Try { resources, body, catches, finally }, start))
    }

    fn resource(&mut self) -> PResult<Spanned<Resource>> {
        let start = self.cur_start();
        let resource = if self.at_decl_start() {
            let modifiers = self.modifiers()?;
            let ty = self.parse_type()?;
            let name = self.expect_ident()?;
            self.expect(&TokenKind::Eq)?;
            let init = self.expr()?;
            Resource::Decl { modifiers, ty, name, init }
        } else {
            Resource::Expr(self.expr()?)
        };
        Ok(Spanned::new(resource, self.span_from(start)))
    }

    // ---- Switch ----

    /// `{ cases }` of a switch statement or expression. The first case fixes
    /// whether the block uses `:` or `->` labels.
    pub(crate) fn switch_block(&mut self) -> PResult<SwitchBody> {
        self.expect(&TokenKind::LBrace)?;
        let mut form = None;
        let mut classic = Vec::new();
        let mut arrow = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            self.check_deadline()?;
            let case_start = self.cur_start();
            let labels = self.case_labels()?;
            let this_form = match self.kind() {
                Some(TokenKind::Arrow) => SwitchForm::Arrow,
                Some(TokenKind::Colon) => SwitchForm::Classic,
                _ => return Err(self.error_expected(["->", ":"])),
            };
            match form {
                None => form = Some(this_form),
                Some(SwitchForm::Classic) if this_form == SwitchForm::Arrow => {
                    return Err(self.error_expected([":"]));
                }
                Some(SwitchForm::Arrow) if this_form == SwitchForm::Classic => {
                    return Err(self.error_expected(["->"]));
                }
                Some(_) => {}
            }
            self.pos += 1;

            match this_form {
                SwitchForm::Arrow => {
                    let body = self.arrow_body()?;
                    let case = ArrowCase { labels, body };
                    arrow.push(Spanned::new(case, self.span_from(case_start)));
                }
                SwitchForm::Classic => {
                    let body = self.case_statements()?;
                    let case = ClassicCase { labels, body };
                    classic.push(Spanned::new(case, self.span_from(case_start)));
                }
            }
        }
        Ok(match form {
            Some(SwitchForm::Arrow) => SwitchBody::Arrow(arrow),
            _ => SwitchBody::Classic(classic),
        })
    }

    /// `case a, b` or `default`. Empty for `default`.
    fn case_labels(&mut self) -> PResult<Vec<ExprId>> {
        if self.eat(&TokenKind::Default) {
            return Ok(Vec::new());
        }
        self.expect(&TokenKind::Case)?;
        let saved = std::mem::replace(&mut self.no_lambda, true);
        let labels = self.case_label_list();
        self.no_lambda = saved;
        labels
    }

    fn case_label_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut labels = vec![self.expr_bp(expr::TERNARY_BP.1)?];
        while self.eat(&TokenKind::Comma) {
            labels.push(self.expr_bp(expr::TERNARY_BP.1)?);
        }
        Ok(labels)
    }

    fn arrow_body(&mut self) -> PResult<ArrowBody> {
        match self.kind() {
            Some(TokenKind::LBrace) => Ok(ArrowBody::Block(self.block()?)),
            Some(TokenKind::Throw) => Ok(ArrowBody::Throw(self.statement()?)),
            _ => {
                let value = self.expr()?;
                self.expect(&TokenKind::Semi)?;
                Ok(ArrowBody::Expr(value))
            }
        }
    }

    fn at_case_label(&self) -> bool {
        match self.kind() {
            Some(TokenKind::Case) => true,
            Some(TokenKind::Default) => {
                self.at_nth(1, &TokenKind::Colon) || self.at_nth(1, &TokenKind::Arrow)
            }
            _ => false,
        }
    }

    /// Statements of a classic case, up to the next label or the closing `}`.
    fn case_statements(&mut self) -> PResult<Vec<StmtId>> {
        let mut stmts = Vec::new();
        loop {
            match self.kind() {
                Some(TokenKind::RBrace) => return Ok(stmts),
                None => return Err(self.error_expected(["}"])),
                Some(_) if self.at_case_label() => return Ok(stmts),
                Some(_) => {
                    let start_pos = self.pos;
                    let result = self.statement();
                    if let Some(stmt) = self.recoverable(result, start_pos)? {
                        stmts.push(stmt);
                    }
                }
            }
        }
    }
}
