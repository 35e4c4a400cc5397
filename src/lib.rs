pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod visit;
pub mod pretty;
pub mod outline;
pub mod config;
pub mod harness;

use thiserror::Error;

use diagnostics::{LexError, SourceError};
use parser::{Interrupted, ParseOptions, ParseResult};

/// Failures that prevent a parse result from being produced at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontendError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

/// Lex and parse a source string, attaching doc comments to declarations.
/// Syntax errors are returned inside the `ParseResult`.
pub fn parse_source(source: &str, options: &ParseOptions) -> Result<ParseResult, FrontendError> {
    let lexed = lexer::tokenize(source)?;
    let mut result = parser::parse_with(&lexed.tokens, source, options)?;
    parser::attach_doc_comments(&mut result.ast, &lexed.tokens, &lexed.comments);
    Ok(result)
}

/// Parse and normalize in one step. Any lex or syntax error is returned
/// as the list of diagnostics.
pub fn normalize_source(source: &str) -> Result<String, Vec<SourceError>> {
    let lexed = lexer::tokenize(source).map_err(|e| vec![SourceError::Lex(e)])?;
    let result = parser::parse(&lexed.tokens, source);
    if !result.errors.is_empty() {
        return Err(result.errors.into_iter().map(SourceError::Parse).collect());
    }
    Ok(pretty::normalize(&result.ast))
}
