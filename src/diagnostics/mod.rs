use crate::span::{LineIndex, Span};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Why the lexer rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error, Serialize)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("empty character literal")]
    EmptyChar,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid escape sequence")]
    InvalidEscape,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{reason} at byte {offset}")]
pub struct LexError {
    pub offset: usize,
    pub reason: LexErrorKind,
}

impl LexError {
    pub fn new(offset: usize, reason: LexErrorKind) -> Self {
        Self { offset, reason }
    }
}

/// A grammar violation: what the parser would have accepted, and what it saw instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("expected {}, found {found}", describe_expected(.expected))]
pub struct ParseError {
    pub expected: BTreeSet<String>,
    pub found: String,
    pub span: Span,
}

impl ParseError {
    pub fn new<I, S>(expected: I, found: impl Into<String>, span: Span) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expected: expected.into_iter().map(Into::into).collect(),
            found: found.into(),
            span,
        }
    }
}

fn describe_expected(expected: &BTreeSet<String>) -> String {
    let items: Vec<&str> = expected.iter().map(String::as_str).collect();
    match items.as_slice() {
        [] => "nothing".to_string(),
        [one] => one.to_string(),
        many => format!("one of {}", many.join(", ")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("timed out after {budget_ms} ms")]
pub struct TimeoutError {
    pub budget_ms: u64,
}

/// Setup failures that abort a harness run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("cannot read corpus `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config `{}`: {msg}", .path.display())]
    Config { path: PathBuf, msg: String },
}

impl HarnessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn config(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Config { path: path.into(), msg: msg.into() }
    }
}

/// Any diagnostic tied to a location in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SourceError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl SourceError {
    pub fn span(&self) -> Span {
        match self {
            SourceError::Lex(e) => Span::new(e.offset, e.offset + 1),
            SourceError::Parse(e) => e.span,
        }
    }

    fn message(&self) -> String {
        match self {
            SourceError::Lex(e) => e.reason.to_string(),
            SourceError::Parse(e) => e.to_string(),
        }
    }

    fn kind_str(&self) -> &'static str {
        match self {
            SourceError::Lex(_) => "lex",
            SourceError::Parse(_) => "syntax",
        }
    }
}

/// One line per error, `path:line:col: message`. Used by the harness report.
pub fn format_plain(path: &str, source: &str, errors: &[SourceError]) -> String {
    let index = LineIndex::new(source);
    let mut out = String::new();
    for err in errors {
        let pos = index.line_col(err.span().start);
        out.push_str(&format!("{path}:{pos}: {} error: {}\n", err.kind_str(), err.message()));
    }
    out
}

/// Render errors with ariadne source labels into a string.
pub fn render_errors(source: &str, errors: &[SourceError], color: bool) -> String {
    use ariadne::{Config, Label, Report, ReportKind, Source};

    let mut buf = Vec::new();
    for err in errors {
        let span = err.span();
        let end = span.end.min(source.len()).max(span.start);
        let report = Report::build(ReportKind::Error, (), span.start)
            .with_config(Config::default().with_color(color))
            .with_message(format!("{} error", err.kind_str()))
            .with_label(Label::new(span.start..end).with_message(err.message()))
            .finish();
        if report.write(Source::from(source), &mut buf).is_err() {
            buf.extend_from_slice(err.to_string().as_bytes());
            buf.push(b'\n');
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
