use super::ast::*;
use super::{Halt, PResult, Parser};
use crate::lexer::TokenKind;
use crate::span::Spanned;

/// Binding power of `?:`. Its right side is also the floor for operands that
/// may not contain a bare assignment (case labels, annotation values).
pub(super) const TERNARY_BP: (u8, u8) = (4, 3);
const ASSIGN_BP: (u8, u8) = (2, 1);
const INSTANCEOF_BP: u8 = 17;

#[derive(Debug, Clone, Copy)]
enum Infix {
    Binary(BinaryOp),
    Assign(AssignOp),
    Ternary,
    InstanceOf,
}

fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Or => (5, 6),
        BinaryOp::And => (7, 8),
        BinaryOp::BitOr => (9, 10),
        BinaryOp::BitXor => (11, 12),
        BinaryOp::BitAnd => (13, 14),
        BinaryOp::Eq | BinaryOp::Ne => (15, 16),
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => (17, 18),
        BinaryOp::ShiftLeft | BinaryOp::ShiftRight | BinaryOp::UnsignedShiftRight => (19, 20),
        BinaryOp::Add | BinaryOp::Sub => (21, 22),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => (23, 24),
    }
}

impl Infix {
    fn binding_power(self) -> (u8, u8) {
        match self {
            Infix::Binary(op) => infix_binding_power(op),
            Infix::Assign(_) => ASSIGN_BP,
            Infix::Ternary => TERNARY_BP,
            Infix::InstanceOf => (INSTANCEOF_BP, INSTANCEOF_BP + 1),
        }
    }
}

fn starts_operand(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::IntLit
            | TokenKind::LongLit
            | TokenKind::FloatLit
            | TokenKind::DoubleLit
            | TokenKind::StringLit(_)
            | TokenKind::CharLit(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::Ident
            | TokenKind::This
            | TokenKind::Super
            | TokenKind::New
            | TokenKind::Switch
            | TokenKind::LParen
            | TokenKind::Bang
            | TokenKind::Tilde
    ) || super::types::primitive_of(kind).is_some()
}

fn prefix_op(kind: &TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Minus => UnaryOp::Neg,
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Tilde => UnaryOp::BitNot,
        TokenKind::PlusPlus => UnaryOp::PreInc,
        TokenKind::MinusMinus => UnaryOp::PreDec,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    pub(super) fn expr(&mut self) -> PResult<ExprId> {
        self.expr_bp(0)
    }

    pub(super) fn expr_bp(&mut self, min_bp: u8) -> PResult<ExprId> {
        self.check_deadline()?;
        self.nested(|p| p.expr_bp_inner(min_bp))
    }

    fn expr_bp_inner(&mut self, min_bp: u8) -> PResult<ExprId> {
        let start = self.cur_start();
        let mut lhs = self.unary()?;

        while let Some((infix, width)) = self.peek_infix() {
            let (l_bp, r_bp) = infix.binding_power();
            if l_bp < min_bp {
                break;
            }
            self.pos += width;

            lhs = match infix {
                Infix::Binary(op) => {
                    let rhs = self.expr_bp(r_bp)?;
                    self.alloc_expr(Expr::Binary { op, lhs, rhs }, start)
                }
                Infix::Assign(op) => {
                    let value = self.expr_bp(r_bp)?;
                    self.alloc_expr(Expr::Assign { op, target: lhs, value }, start)
                }
                Infix::Ternary => {
                    let then_expr = self.expr_bp(0)?;
                    self.expect(&TokenKind::Colon)?;
                    let else_expr = self.expr_bp(r_bp)?;
                    self.alloc_expr(Expr::Ternary { cond: lhs, then_expr, else_expr }, start)
                }
                Infix::InstanceOf => {
                    let is_final = self.eat(&TokenKind::Final);
                    let ty = self.parse_type()?;
                    let binding =
                        if self.at(&TokenKind::Ident) { Some(self.expect_ident()?) } else { None };
                    self.alloc_expr(Expr::InstanceOf { expr: lhs, ty, binding, is_final }, start)
                }
            };
        }
        Ok(lhs)
    }

    /// The infix operator at the cursor and how many tokens spell it. Shift
    /// operators are assembled from adjacent `>` tokens, which the lexer keeps
    /// separate so that nested type arguments close cleanly.
    fn peek_infix(&self) -> Option<(Infix, usize)> {
        let kind = self.kind()?;
        let infix = match kind {
            TokenKind::Gt => return Some(self.peek_greater()),
            TokenKind::PipePipe => Infix::Binary(BinaryOp::Or),
            TokenKind::AmpAmp => Infix::Binary(BinaryOp::And),
            TokenKind::Pipe => Infix::Binary(BinaryOp::BitOr),
            TokenKind::Caret => Infix::Binary(BinaryOp::BitXor),
            TokenKind::Amp => Infix::Binary(BinaryOp::BitAnd),
            TokenKind::EqEq => Infix::Binary(BinaryOp::Eq),
            TokenKind::BangEq => Infix::Binary(BinaryOp::Ne),
            TokenKind::Lt => Infix::Binary(BinaryOp::Lt),
            TokenKind::LtEq => Infix::Binary(BinaryOp::Le),
            TokenKind::GtEq => Infix::Binary(BinaryOp::Ge),
            TokenKind::Shl => Infix::Binary(BinaryOp::ShiftLeft),
            TokenKind::Plus => Infix::Binary(BinaryOp::Add),
            TokenKind::Minus => Infix::Binary(BinaryOp::Sub),
            TokenKind::Star => Infix::Binary(BinaryOp::Mul),
            TokenKind::Slash => Infix::Binary(BinaryOp::Div),
            TokenKind::Percent => Infix::Binary(BinaryOp::Rem),
            TokenKind::Eq => Infix::Assign(AssignOp::Assign),
            TokenKind::PlusEq => Infix::Assign(AssignOp::Add),
            TokenKind::MinusEq => Infix::Assign(AssignOp::Sub),
            TokenKind::StarEq => Infix::Assign(AssignOp::Mul),
            TokenKind::SlashEq => Infix::Assign(AssignOp::Div),
            TokenKind::PercentEq => Infix::Assign(AssignOp::Rem),
            TokenKind::AmpEq => Infix::Assign(AssignOp::BitAnd),
            TokenKind::PipeEq => Infix::Assign(AssignOp::BitOr),
            TokenKind::CaretEq => Infix::Assign(AssignOp::BitXor),
            TokenKind::ShlEq => Infix::Assign(AssignOp::ShiftLeft),
            TokenKind::Question => Infix::Ternary,
            TokenKind::Instanceof => Infix::InstanceOf,
            _ => return None,
        };
        Some((infix, 1))
    }

    fn peek_greater(&self) -> (Infix, usize) {
        let adjacent = |n: usize| match (self.nth(n - 1), self.nth(n)) {
            (Some(a), Some(b)) => a.span.end == b.span.start,
            _ => false,
        };
        let kind_is = |n: usize, kind: &TokenKind| adjacent(n) && self.at_nth(n, kind);

        if kind_is(1, &TokenKind::Gt) {
            if kind_is(2, &TokenKind::GtEq) {
                return (Infix::Assign(AssignOp::UnsignedShiftRight), 3);
            }
            if kind_is(2, &TokenKind::Gt) {
                return (Infix::Binary(BinaryOp::UnsignedShiftRight), 3);
            }
            return (Infix::Binary(BinaryOp::ShiftRight), 2);
        }
        if kind_is(1, &TokenKind::GtEq) {
            return (Infix::Assign(AssignOp::ShiftRight), 2);
        }
        (Infix::Binary(BinaryOp::Gt), 1)
    }

    fn unary(&mut self) -> PResult<ExprId> {
        let start = self.cur_start();
        if let Some(op) = self.kind().and_then(prefix_op) {
            self.pos += 1;
            let operand = self.nested(Self::unary)?;
            return Ok(self.alloc_expr(Expr::Unary { op, operand }, start));
        }
        if self.at_lambda() {
            return self.lambda(start);
        }
        if self.at(&TokenKind::LParen) {
            if let Some(cast) = self.try_cast(start)? {
                return Ok(cast);
            }
        }
        let primary = self.primary()?;
        self.postfix(primary, start)
    }

    /// `x ->` or a parenthesized list followed by `->`.
    fn at_lambda(&self) -> bool {
        if self.no_lambda {
            return false;
        }
        match self.kind() {
            Some(TokenKind::Ident) => self.at_nth(1, &TokenKind::Arrow),
            Some(TokenKind::LParen) => {
                let mut depth = 0usize;
                let mut i = self.pos;
                loop {
                    match self.kind_at(i) {
                        Some(TokenKind::LParen) => depth += 1,
                        Some(TokenKind::RParen) => {
                            depth -= 1;
                            if depth == 0 {
                                return self.kind_at(i + 1) == Some(&TokenKind::Arrow);
                            }
                        }
                        Some(_) => {}
                        None => return false,
                    }
                    i += 1;
                }
            }
            _ => false,
        }
    }

    fn lambda(&mut self, start: usize) -> PResult<ExprId> {
        let params = if self.at(&TokenKind::Ident) {
            LambdaParams::Inferred(vec![self.expect_ident()?])
        } else if self.at_nth(1, &TokenKind::RParen) {
            self.pos += 2;
            LambdaParams::Inferred(Vec::new())
        } else if self.at_nth(1, &TokenKind::Ident)
            && (self.at_nth(2, &TokenKind::Comma) || self.at_nth(2, &TokenKind::RParen))
        {
            self.expect(&TokenKind::LParen)?;
            let mut names = vec![self.expect_ident()?];
            while self.eat(&TokenKind::Comma) {
                names.push(self.expect_ident()?);
            }
            self.expect(&TokenKind::RParen)?;
            LambdaParams::Inferred(names)
        } else {
            LambdaParams::Typed(self.params()?)
        };
        self.expect(&TokenKind::Arrow)?;

        // The body is a fresh context, even inside a case label.
        let saved = std::mem::replace(&mut self.no_lambda, false);
        let body = if self.at(&TokenKind::LBrace) {
            self.block().map(LambdaBody::Block)
        } else {
            self.expr().map(LambdaBody::Expr)
        };
        self.no_lambda = saved;
        let body = body?;
        Ok(self.alloc_expr(Expr::Lambda { params, body }, start))
    }

    /// `(Type) operand`, or `None` with the cursor restored when the
    /// parenthesized text is not a cast.
    fn try_cast(&mut self, start: usize) -> PResult<Option<ExprId>> {
        let cp = self.checkpoint();
        self.pos += 1;
        let ty = match self.parse_type() {
            Ok(ty) => ty,
            Err(Halt::Deadline) => return Err(Halt::Deadline),
            Err(Halt::Syntax(_)) => {
                self.rewind(cp);
                return Ok(None);
            }
        };
        if !self.eat(&TokenKind::RParen) {
            self.rewind(cp);
            return Ok(None);
        }

        let primitive = matches!(self.ast.ty(ty).node, TypeNode::Primitive(_));
        let is_cast = match self.kind() {
            // `(a) + b` is an addition unless `a` names a primitive type.
            Some(
                TokenKind::Plus | TokenKind::Minus | TokenKind::PlusPlus | TokenKind::MinusMinus,
            ) => primitive,
            Some(kind) => starts_operand(kind),
            None => false,
        };
        if !is_cast {
            self.rewind(cp);
            return Ok(None);
        }
        let operand = self.nested(Self::unary)?;
        Ok(Some(self.alloc_expr(Expr::Cast { ty, expr: operand }, start)))
    }

    fn postfix(&mut self, mut expr: ExprId, start: usize) -> PResult<ExprId> {
        loop {
            match self.kind() {
                Some(TokenKind::Dot) => {
                    self.pos += 1;
                    expr = self.member_suffix(expr, start)?;
                }
                Some(TokenKind::LBracket) if self.at_nth(1, &TokenKind::RBracket) => {
                    let mut ty = self.expr_to_type(expr)?;
                    while self.at(&TokenKind::LBracket) && self.at_nth(1, &TokenKind::RBracket) {
                        self.pos += 2;
                        ty = self.alloc_type(TypeNode::Array { element: ty }, start);
                    }
                    expr = self.type_suffix(ty, start)?;
                }
                Some(TokenKind::LBracket) => {
                    self.pos += 1;
                    let index = self.expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = self.alloc_expr(Expr::ArrayAccess { array: expr, index }, start);
                }
                Some(TokenKind::PlusPlus) => {
                    self.pos += 1;
                    expr = self.alloc_expr(Expr::Unary { op: UnaryOp::PostInc, operand: expr }, start);
                }
                Some(TokenKind::MinusMinus) => {
                    self.pos += 1;
                    expr = self.alloc_expr(Expr::Unary { op: UnaryOp::PostDec, operand: expr }, start);
                }
                Some(TokenKind::ColonColon) => {
                    self.pos += 1;
                    expr = self.method_ref(MethodRefTarget::Expr(expr), start)?;
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Whatever follows `target.`
    fn member_suffix(&mut self, target: ExprId, start: usize) -> PResult<ExprId> {
        let Some(tok) = self.nth(0) else {
            return Err(self.error_expected(["identifier"]));
        };
        match tok.kind {
            TokenKind::Ident => {
                let name = self.expect_ident()?;
                if self.at(&TokenKind::LParen) {
                    let args = self.arguments()?;
                    let call = Expr::MethodCall { target: Some(target), type_args: Vec::new(), name, args };
                    Ok(self.alloc_expr(call, start))
                } else {
                    Ok(self.alloc_expr(Expr::FieldAccess { target, name }, start))
                }
            }
            TokenKind::Lt => {
                let type_args = self.type_args()?;
                let name = self.expect_ident()?;
                let args = self.arguments()?;
                let call = Expr::MethodCall { target: Some(target), type_args, name, args };
                Ok(self.alloc_expr(call, start))
            }
            // `Outer.this` and `Outer.super`
            TokenKind::This | TokenKind::Super => {
                self.pos += 1;
                let name = Spanned::new(tok.lexeme.to_string(), tok.span);
                Ok(self.alloc_expr(Expr::FieldAccess { target, name }, start))
            }
            TokenKind::Class => {
                self.pos += 1;
                let ty = self.expr_to_type(target)?;
                Ok(self.alloc_expr(Expr::ClassLiteral(ty), start))
            }
            _ => Err(self.error_expected(["identifier", "<", "this", "super", "class"])),
        }
    }

    /// `.class` or `::` after an array or primitive type.
    fn type_suffix(&mut self, ty: TypeId, start: usize) -> PResult<ExprId> {
        if self.eat(&TokenKind::Dot) {
            self.expect(&TokenKind::Class)?;
            return Ok(self.alloc_expr(Expr::ClassLiteral(ty), start));
        }
        if self.eat(&TokenKind::ColonColon) {
            return self.method_ref(MethodRefTarget::Type(ty), start);
        }
        Err(self.error_expected([".", "::"]))
    }

    /// The part of a method reference after `::`.
    fn method_ref(&mut self, target: MethodRefTarget, start: usize) -> PResult<ExprId> {
        let type_args = if self.at(&TokenKind::Lt) { self.type_args()? } else { Vec::new() };
        let name = match self.nth(0) {
            Some(tok) if tok.kind == TokenKind::New => {
                self.pos += 1;
                Spanned::new("new".to_string(), tok.span)
            }
            _ => self.expect_ident()?,
        };
        Ok(self.alloc_expr(Expr::MethodRef { target, type_args, name }, start))
    }

    fn primary(&mut self) -> PResult<ExprId> {
        let start = self.cur_start();
        let Some(tok) = self.nth(0) else {
            return Err(self.error_expected(["expression"]));
        };
        let literal = match &tok.kind {
            TokenKind::IntLit => Some(Literal::Int(tok.lexeme.to_string())),
            TokenKind::LongLit => Some(Literal::Long(tok.lexeme.to_string())),
            TokenKind::FloatLit => Some(Literal::Float(tok.lexeme.to_string())),
            TokenKind::DoubleLit => Some(Literal::Double(tok.lexeme.to_string())),
            TokenKind::StringLit(value) => Some(Literal::String(value.clone())),
            TokenKind::CharLit(value) => Some(Literal::Char(value.clone())),
            TokenKind::True => Some(Literal::Bool(true)),
            TokenKind::False => Some(Literal::Bool(false)),
            TokenKind::Null => Some(Literal::Null),
            _ => None,
        };
        if let Some(literal) = literal {
            self.pos += 1;
            return Ok(self.alloc_expr(Expr::Literal(literal), start));
        }

        match &tok.kind {
            TokenKind::Ident => {
                let name = self.expect_ident()?;
                if self.at(&TokenKind::LParen) {
                    let args = self.arguments()?;
                    let call = Expr::MethodCall { target: None, type_args: Vec::new(), name, args };
                    Ok(self.alloc_expr(call, start))
                } else {
                    Ok(self.alloc_expr(Expr::Name(name), start))
                }
            }
            TokenKind::This | TokenKind::Super => {
                self.pos += 1;
                if self.at(&TokenKind::LParen) {
                    // Explicit constructor invocation.
                    let name = Spanned::new(tok.lexeme.to_string(), tok.span);
                    let args = self.arguments()?;
                    let call = Expr::MethodCall { target: None, type_args: Vec::new(), name, args };
                    return Ok(self.alloc_expr(call, start));
                }
                let expr = if tok.kind == TokenKind::This { Expr::This } else { Expr::Super };
                Ok(self.alloc_expr(expr, start))
            }
            TokenKind::LParen => {
                self.pos += 1;
                let inner = self.expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::New => self.creation(start),
            TokenKind::Switch => {
                self.pos += 1;
                let selector = self.paren_expr()?;
                let body = self.switch_block()?;
                Ok(self.alloc_expr(Expr::Switch { selector, body }, start))
            }
            kind if super::types::primitive_of(kind).is_some() => {
                let ty = self.parse_type()?;
                self.type_suffix(ty, start)
            }
            _ => Err(self.error_expected(["expression"])),
        }
    }

    /// `new T(args) { body }` or `new T[n][]` or `new T[] { .. }`.
    fn creation(&mut self, start: usize) -> PResult<ExprId> {
        self.expect(&TokenKind::New)?;
        let element = self.non_array_type()?;

        if self.at(&TokenKind::LBracket) {
            let mut dims = Vec::new();
            while self.at(&TokenKind::LBracket) && !self.at_nth(1, &TokenKind::RBracket) {
                self.pos += 1;
                dims.push(self.expr()?);
                self.expect(&TokenKind::RBracket)?;
            }
            let mut extra_dims = 0;
            while self.at(&TokenKind::LBracket) && self.at_nth(1, &TokenKind::RBracket) {
                self.pos += 2;
                extra_dims += 1;
            }
            let init = if dims.is_empty() { Some(self.array_initializer()?) } else { None };
            let expr = Expr::NewArray { element, dims, extra_dims, init };
            return Ok(self.alloc_expr(expr, start));
        }

        let args = self.arguments()?;
        let body = if self.at(&TokenKind::LBrace) { Some(self.class_body()?) } else { None };
        Ok(self.alloc_expr(Expr::New { ty: element, args, body }, start))
    }

    pub(super) fn arguments(&mut self) -> PResult<Vec<ExprId>> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    /// `{ a, { b }, }`. A trailing comma is allowed.
    pub(super) fn array_initializer(&mut self) -> PResult<ExprId> {
        let start = self.cur_start();
        self.expect(&TokenKind::LBrace)?;
        let mut items = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            let item = if self.at(&TokenKind::LBrace) {
                self.nested(Self::array_initializer)?
            } else {
                self.expr()?
            };
            items.push(item);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.alloc_expr(Expr::ArrayInit(items), start))
    }

    /// Reinterpret a dotted name expression as a type, for `Name.class` and `Name[]`.
    fn expr_to_type(&mut self, expr: ExprId) -> PResult<TypeId> {
        let mut segments = Vec::new();
        let mut cur = expr;
        loop {
            match &self.ast.expr(cur).node {
                Expr::Name(name) => {
                    segments.push(name.clone());
                    break;
                }
                Expr::FieldAccess { target, name } => {
                    segments.push(name.clone());
                    cur = *target;
                }
                _ => return Err(self.error_expected(["type name"])),
            }
        }
        segments.reverse();
        let span = self.ast.expr(expr).span;
        Ok(self.ast.types.alloc(super::types::named_or_boxed(segments), span))
    }
}
