//! Golden-file harness: parse every source file under a corpus directory,
//! normalize it and compare against the golden stored next to it.

pub mod report;

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossbeam_channel as channel;
use similar::TextDiff;
use tracing::{debug, info, info_span, warn};
use walkdir::WalkDir;

pub use report::{ErroredFile, FailedFile, FileError, Mismatch, Outcome, Report};

use crate::config::HarnessOptions;
use crate::diagnostics::{HarnessError, TimeoutError};
use crate::lexer::tokenize_bytes;
use crate::parser::{attach_doc_comments, parse_with, ParseOptions};
use crate::pretty::normalize;

/// Deeply nested fixtures recurse far; give workers room.
const WORKER_STACK: usize = 16 * 1024 * 1024;

/// Run the whole corpus. Only setup problems are errors; everything that goes
/// wrong with a single file lands in the report.
pub fn run(corpus: &Path, options: &HarnessOptions) -> Result<Report, HarnessError> {
    let files = discover(corpus, options)?;
    let workers = options.worker_count().min(files.len()).max(1);
    info!(corpus = %corpus.display(), files = files.len(), workers, "running corpus");

    let (job_tx, job_rx) = channel::unbounded::<PathBuf>();
    let (result_tx, result_rx) = channel::unbounded::<(PathBuf, Outcome)>();
    for file in files {
        // The receiver is alive until the scope below ends.
        let _ = job_tx.send(file);
    }
    drop(job_tx);

    let mut report = Report::default();
    std::thread::scope(|scope| -> Result<(), HarnessError> {
        let mut spawned = 0;
        let mut spawn_error = None;
        for i in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let worker = std::thread::Builder::new()
                .name(format!("jparse-worker-{i}"))
                .stack_size(WORKER_STACK)
                .spawn_scoped(scope, move || {
                    for path in job_rx {
                        let outcome = process_file(&path, options);
                        if result_tx.send((path, outcome)).is_err() {
                            break;
                        }
                    }
                });
            match worker {
                Ok(_) => spawned += 1,
                Err(e) => {
                    warn!(error = %e, "could not spawn worker");
                    spawn_error = Some(e);
                }
            }
        }
        drop(result_tx);
        if spawned == 0 {
            if let Some(e) = spawn_error {
                return Err(HarnessError::io(corpus, e));
            }
        }

        for (path, outcome) in result_rx.iter() {
            let rel = path.strip_prefix(corpus).map(Path::to_path_buf).unwrap_or(path);
            report.add(rel, outcome);
        }
        Ok(())
    })?;

    report.finish();
    info!(summary = %report.summary(), "corpus done");
    Ok(report)
}

/// Every source file under `corpus`, sorted.
pub fn discover(corpus: &Path, options: &HarnessOptions) -> Result<Vec<PathBuf>, HarnessError> {
    if !corpus.is_dir() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory");
        return Err(HarnessError::io(corpus, err));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(corpus).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| corpus.to_path_buf());
            HarnessError::io(path, e.into())
        })?;
        if entry.file_type().is_file() && options.is_source(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Parse, normalize and compare (or record) one fixture.
pub fn process_file(path: &Path, options: &HarnessOptions) -> Outcome {
    let _span = info_span!("file", path = %path.display()).entered();
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return Outcome::Errors(vec![FileError::io(&e)]),
    };

    let normalized = match panic::catch_unwind(AssertUnwindSafe(|| normalize_bytes(&bytes, options))) {
        Ok(Ok(text)) => text,
        Ok(Err(errors)) => {
            debug!(count = errors.len(), "file has errors");
            return Outcome::Errors(errors);
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "parser panicked".to_string());
            warn!(%message, "parser panicked");
            return Outcome::Errors(vec![FileError::Internal { message }]);
        }
    };

    let golden = options.golden_path(path);
    if options.record {
        return record(&golden, &normalized);
    }
    compare(path, &golden, &normalized)
}

/// Lex, parse and normalize raw file contents. Errors carry line:column.
pub fn normalize_bytes(bytes: &[u8], options: &HarnessOptions) -> Result<String, Vec<FileError>> {
    let source = String::from_utf8_lossy(bytes);
    let lexed = tokenize_bytes(bytes).map_err(|e| vec![FileError::lex(&source, e)])?;

    let parse_options = ParseOptions {
        recover: options.recover,
        deadline: options.timeout_ms.map(|ms| Instant::now() + Duration::from_millis(ms)),
    };
    let result = parse_with(&lexed.tokens, &source, &parse_options).map_err(|_| {
        let budget_ms = options.timeout_ms.unwrap_or(0);
        vec![FileError::Timeout { error: TimeoutError { budget_ms } }]
    })?;
    if !result.errors.is_empty() {
        return Err(FileError::parse_errors(&source, result.errors));
    }

    let mut ast = result.ast;
    attach_doc_comments(&mut ast, &lexed.tokens, &lexed.comments);
    Ok(normalize(&ast))
}

fn record(golden: &Path, normalized: &str) -> Outcome {
    let existing = std::fs::read_to_string(golden).ok().map(|s| s.replace("\r\n", "\n"));
    if existing.as_deref() == Some(normalized) {
        return Outcome::Recorded { changed: false };
    }
    match std::fs::write(golden, normalized) {
        Ok(()) => {
            info!(golden = %golden.display(), "golden recorded");
            Outcome::Recorded { changed: true }
        }
        Err(e) => Outcome::Errors(vec![FileError::io(&e)]),
    }
}

fn compare(path: &Path, golden: &Path, normalized: &str) -> Outcome {
    let expected = match std::fs::read_to_string(golden) {
        Ok(text) => text.replace("\r\n", "\n"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Outcome::Mismatch(Mismatch::GoldenMissing { golden: golden.to_path_buf() });
        }
        Err(e) => return Outcome::Errors(vec![FileError::io(&e)]),
    };
    if expected == normalized {
        return Outcome::Passed;
    }
    debug!("golden mismatch");
    Outcome::Mismatch(Mismatch::Diff { diff: unified_diff(path, &expected, normalized) })
}

pub fn unified_diff(path: &Path, expected: &str, actual: &str) -> String {
    let name = path.display().to_string();
    TextDiff::from_lines(expected, actual)
        .unified_diff()
        .context_radius(3)
        .header(&format!("expected/{name}"), &format!("actual/{name}"))
        .to_string()
}
