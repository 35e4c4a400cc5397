use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::diagnostics::{LexError, ParseError, TimeoutError};
use crate::span::{LineCol, LineIndex};

/// Result of running one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// Golden rewritten in record mode. `changed` is false when it already matched.
    Recorded { changed: bool },
    Mismatch(Mismatch),
    Errors(Vec<FileError>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    /// Normalized output differs from the golden. Carries a unified diff.
    Diff { diff: String },
    GoldenMissing { golden: PathBuf },
}

/// A per-file error. Never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileError {
    Lex { error: LexError, at: LineCol },
    Parse { error: ParseError, at: LineCol },
    Timeout { error: TimeoutError },
    Io { message: String },
    /// The parser panicked. Always a bug.
    Internal { message: String },
}

impl FileError {
    pub fn lex(source: &str, error: LexError) -> Self {
        let at = LineIndex::new(source).line_col(error.offset);
        FileError::Lex { error, at }
    }

    pub fn parse_errors(source: &str, errors: Vec<ParseError>) -> Vec<Self> {
        let index = LineIndex::new(source);
        errors
            .into_iter()
            .map(|error| FileError::Parse { at: index.line_col(error.span.start), error })
            .collect()
    }

    pub fn io(err: &std::io::Error) -> Self {
        FileError::Io { message: err.to_string() }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Lex { error, at } => write!(f, "{at}: lex error: {}", error.reason),
            FileError::Parse { error, at } => write!(f, "{at}: syntax error: {error}"),
            FileError::Timeout { error } => write!(f, "{error}"),
            FileError::Io { message } => write!(f, "io error: {message}"),
            FileError::Internal { message } => write!(f, "internal error: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    #[serde(flatten)]
    pub mismatch: Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErroredFile {
    pub path: PathBuf,
    pub errors: Vec<FileError>,
}

/// Aggregate of a harness run. Paths are relative to the corpus root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub passed: usize,
    pub recorded: usize,
    pub failed: Vec<FailedFile>,
    pub errors: Vec<ErroredFile>,
}

impl Report {
    pub fn add(&mut self, path: PathBuf, outcome: Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Recorded { .. } => self.recorded += 1,
            Outcome::Mismatch(mismatch) => self.failed.push(FailedFile { path, mismatch }),
            Outcome::Errors(errors) => self.errors.push(ErroredFile { path, errors }),
        }
    }

    /// Sort entries by path so output does not depend on worker scheduling.
    pub fn finish(&mut self) {
        self.failed.sort_by(|a, b| a.path.cmp(&b.path));
        self.errors.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn total(&self) -> usize {
        self.passed + self.recorded + self.failed.len() + self.errors.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.errors.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} passed, {} failed, {} errors",
            self.passed,
            self.failed.len(),
            self.errors.len()
        );
        if self.recorded > 0 {
            line.push_str(&format!(", {} recorded", self.recorded));
        }
        line
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Summary line, then a diff per mismatch and one line per error.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for failed in &self.failed {
            let path = display_path(&failed.path);
            match &failed.mismatch {
                Mismatch::Diff { diff } => {
                    writeln!(f, "\nFAIL {path}")?;
                    write!(f, "{diff}")?;
                }
                Mismatch::GoldenMissing { golden } => {
                    writeln!(f, "\nFAIL {path}: missing golden {}", display_path(golden))?;
                }
            }
        }
        for errored in &self.errors {
            writeln!(f, "\nERROR {}", display_path(&errored.path))?;
            for error in &errored.errors {
                writeln!(f, "  {}:{error}", display_path(&errored.path))?;
            }
        }
        Ok(())
    }
}
