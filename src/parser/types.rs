use super::ast::*;
use super::{PResult, Parser};
use crate::lexer::TokenKind;
use crate::span::Spanned;

pub(super) fn primitive_of(kind: &TokenKind) -> Option<PrimitiveType> {
    Some(match kind {
        TokenKind::Boolean => PrimitiveType::Boolean,
        TokenKind::Byte => PrimitiveType::Byte,
        TokenKind::Char => PrimitiveType::Char,
        TokenKind::Short => PrimitiveType::Short,
        TokenKind::Int => PrimitiveType::Int,
        TokenKind::Long => PrimitiveType::Long,
        TokenKind::Float => PrimitiveType::Float,
        TokenKind::Double => PrimitiveType::Double,
        TokenKind::Void => PrimitiveType::Void,
        _ => return None,
    })
}

/// A single-segment wrapper class name becomes `Boxed`, anything else `Named`.
pub(super) fn named_or_boxed(name: QualifiedName) -> TypeNode {
    if let [single] = name.as_slice() {
        if let Some(boxed) = BoxedType::from_name(&single.node) {
            return TypeNode::Boxed(boxed);
        }
    }
    TypeNode::Named(name)
}

fn modifier_of(kind: &TokenKind) -> Option<Modifier> {
    Some(match kind {
        TokenKind::Public => Modifier::Public,
        TokenKind::Protected => Modifier::Protected,
        TokenKind::Private => Modifier::Private,
        TokenKind::Abstract => Modifier::Abstract,
        TokenKind::Default => Modifier::Default,
        TokenKind::Static => Modifier::Static,
        TokenKind::Final => Modifier::Final,
        TokenKind::Transient => Modifier::Transient,
        TokenKind::Volatile => Modifier::Volatile,
        TokenKind::Synchronized => Modifier::Synchronized,
        TokenKind::Native => Modifier::Native,
        TokenKind::Strictfp => Modifier::Strictfp,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    /// A type followed by any number of `[]`.
    pub(super) fn parse_type(&mut self) -> PResult<TypeId> {
        self.nested(|p| {
            let start = p.cur_start();
            let mut ty = p.non_array_type()?;
            while p.at(&TokenKind::LBracket) && p.at_nth(1, &TokenKind::RBracket) {
                p.pos += 2;
                ty = p.alloc_type(TypeNode::Array { element: ty }, start);
            }
            Ok(ty)
        })
    }

    /// A primitive, or a qualified name with optional type arguments.
    pub(super) fn non_array_type(&mut self) -> PResult<TypeId> {
        let start = self.cur_start();
        if let Some(prim) = self.kind().and_then(primitive_of) {
            self.pos += 1;
            return Ok(self.alloc_type(TypeNode::Primitive(prim), start));
        }

        let mut name = vec![self.expect_ident()?];
        while self.at(&TokenKind::Dot) && self.at_nth(1, &TokenKind::Ident) {
            self.pos += 1;
            name.push(self.expect_ident()?);
        }
        let raw = self.alloc_type(named_or_boxed(name), start);
        if !self.at(&TokenKind::Lt) {
            return Ok(raw);
        }
        let args = self.type_args()?;
        Ok(self.alloc_type(TypeNode::Generic { raw, args }, start))
    }

    /// `<A, ? extends B>`, or the diamond `<>` as an empty list.
    pub(super) fn type_args(&mut self) -> PResult<Vec<TypeId>> {
        self.expect(&TokenKind::Lt)?;
        let mut args = Vec::new();
        if self.eat(&TokenKind::Gt) {
            return Ok(args);
        }
        loop {
            args.push(self.type_arg()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::Gt)?;
        Ok(args)
    }

    fn type_arg(&mut self) -> PResult<TypeId> {
        let start = self.cur_start();
        if !self.eat(&TokenKind::Question) {
            return self.parse_type();
        }
        let bound = if self.eat(&TokenKind::Extends) {
            Some((WildcardBound::Extends, self.parse_type()?))
        } else if self.eat(&TokenKind::Super) {
            Some((WildcardBound::Super, self.parse_type()?))
        } else {
            None
        };
        Ok(self.alloc_type(TypeNode::Wildcard { bound }, start))
    }

    /// `<T, U extends Comparable<U> & Serializable>`
    pub(super) fn type_params(&mut self) -> PResult<Vec<TypeParam>> {
        self.expect(&TokenKind::Lt)?;
        let mut params = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let mut bounds = Vec::new();
            if self.eat(&TokenKind::Extends) {
                bounds.push(self.parse_type()?);
                while self.eat(&TokenKind::Amp) {
                    bounds.push(self.parse_type()?);
                }
            }
            params.push(TypeParam { name, bounds });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::Gt)?;
        Ok(params)
    }

    /// Keyword modifiers and annotations in any order.
    pub(super) fn modifiers(&mut self) -> PResult<ModifierSet> {
        let mut set = ModifierSet::default();
        loop {
            match self.kind() {
                Some(TokenKind::At) if !self.at_nth(1, &TokenKind::Interface) => {
                    set.annotations.push(self.annotation()?);
                }
                // `default:` and `default ->` are switch labels.
                Some(TokenKind::Default)
                    if self.at_nth(1, &TokenKind::Colon) || self.at_nth(1, &TokenKind::Arrow) =>
                {
                    return Ok(set);
                }
                // `synchronized (lock)` is a statement.
                Some(TokenKind::Synchronized) if self.at_nth(1, &TokenKind::LParen) => {
                    return Ok(set);
                }
                Some(kind) => match modifier_of(kind) {
                    Some(modifier) => {
                        self.pos += 1;
                        set.modifiers.push(modifier);
                    }
                    None => return Ok(set),
                },
                None => return Ok(set),
            }
        }
    }

    pub(super) fn annotation(&mut self) -> PResult<Spanned<Annotation>> {
        let start = self.cur_start();
        self.expect(&TokenKind::At)?;
        let name = self.qualified_name()?;
        let args = if self.eat(&TokenKind::LParen) {
            let args = if self.at(&TokenKind::RParen) {
                AnnotationArgs::Named(Vec::new())
            } else if self.at(&TokenKind::Ident) && self.at_nth(1, &TokenKind::Eq) {
                let mut pairs = Vec::new();
                loop {
                    let key = self.expect_ident()?;
                    self.expect(&TokenKind::Eq)?;
                    pairs.push((key, self.element_value()?));
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                AnnotationArgs::Named(pairs)
            } else {
                AnnotationArgs::Single(self.element_value()?)
            };
            self.expect(&TokenKind::RParen)?;
            args
        } else {
            AnnotationArgs::None
        };
        Ok(Spanned::new(Annotation { name, args }, self.span_from(start)))
    }

    pub(super) fn element_value(&mut self) -> PResult<ElementValue> {
        match self.kind() {
            Some(TokenKind::At) => Ok(ElementValue::Annotation(Box::new(self.annotation()?))),
            Some(TokenKind::LBrace) => {
                self.pos += 1;
                let mut items = Vec::new();
                while !self.at(&TokenKind::RBrace) {
                    items.push(self.nested(Self::element_value)?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBrace)?;
                Ok(ElementValue::Array(items))
            }
            _ => Ok(ElementValue::Expr(self.expr_bp(super::expr::TERNARY_BP.1)?)),
        }
    }

    /// `a.b.c`. Stops before `.*` and `.class`.
    pub(super) fn qualified_name(&mut self) -> PResult<QualifiedName> {
        let mut name = vec![self.expect_ident()?];
        while self.at(&TokenKind::Dot) && self.at_nth(1, &TokenKind::Ident) {
            self.pos += 1;
            name.push(self.expect_ident()?);
        }
        Ok(name)
    }
}
