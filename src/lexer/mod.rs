pub mod token;
pub use token::{is_keyword, CommentKind, TokenClass, TokenKind};

use crate::diagnostics::{LexError, LexErrorKind};
use crate::span::Span;
use logos::Logos;
use serde::Serialize;

/// A lexed token. `lexeme` borrows the exact source text of the token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub kind: CommentKind,
    pub span: Span,
}

/// Output of a complete lex: tokens in order, comments on the side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lexed<'src> {
    pub tokens: Vec<Token<'src>>,
    pub comments: Vec<Comment>,
}

/// Lazy token stream over one source buffer. Stops after the first error.
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, TokenKind>,
    comments: Vec<Comment>,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, inner: TokenKind::lexer(source), comments: Vec::new(), done: false }
    }

    /// Rewind to the start of the source, dropping collected comments.
    pub fn restart(&mut self) {
        self.inner = TokenKind::lexer(self.source);
        self.comments.clear();
        self.done = false;
    }

    /// Comments seen so far.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn into_comments(self) -> Vec<Comment> {
        self.comments
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some(result) = self.inner.next() else {
                self.done = true;
                return None;
            };
            let range = self.inner.span();
            let span = Span::new(range.start, range.end);
            match result {
                Ok(TokenKind::Comment(kind)) => {
                    self.comments.push(Comment { kind, span });
                }
                Ok(kind) => {
                    return Some(Ok(Token { kind, lexeme: self.inner.slice(), span }));
                }
                Err(fault) => {
                    self.done = true;
                    return Some(Err(LexError::new(span.start + fault.at, fault.reason)));
                }
            }
        }
    }
}

/// Lex a whole source buffer.
pub fn tokenize(source: &str) -> Result<Lexed<'_>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    for token in lexer.by_ref() {
        tokens.push(token?);
    }
    Ok(Lexed { tokens, comments: lexer.into_comments() })
}

/// Lex raw bytes, rejecting input that is not UTF-8.
pub fn tokenize_bytes(bytes: &[u8]) -> Result<Lexed<'_>, LexError> {
    let source = std::str::from_utf8(bytes)
        .map_err(|e| LexError::new(e.valid_up_to(), LexErrorKind::InvalidUtf8))?;
    tokenize(source)
}
