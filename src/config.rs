use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::HarnessError;

pub const CONFIG_FILE: &str = "jparse.toml";

/// Settings for one harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessOptions {
    /// Worker threads. `None` uses the available parallelism.
    pub jobs: Option<usize>,
    /// Per-file parse budget in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Keep parsing after the first syntax error in a file.
    pub recover: bool,
    /// Rewrite goldens instead of comparing against them.
    pub record: bool,
    /// Extension of golden files, without the dot.
    pub golden_extension: String,
    /// Source file extensions to collect, without the dot.
    pub extensions: Vec<String>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            jobs: None,
            timeout_ms: None,
            recover: false,
            record: false,
            golden_extension: "golden".to_string(),
            extensions: vec!["java".to_string()],
        }
    }
}

impl HarnessOptions {
    /// Defaults overlaid with `jparse.toml` from the corpus root, if present.
    pub fn load(corpus_root: &Path) -> Result<Self, HarnessError> {
        let mut options = Self::default();
        let path = corpus_root.join(CONFIG_FILE);
        if path.is_file() {
            options.apply(&ConfigFile::read(&path)?);
        }
        Ok(options)
    }

    pub fn apply(&mut self, file: &ConfigFile) {
        if let Some(jobs) = file.jobs {
            self.jobs = Some(jobs);
        }
        if let Some(timeout) = file.timeout_ms {
            self.timeout_ms = Some(timeout);
        }
        if let Some(recover) = file.recover {
            self.recover = recover;
        }
        if let Some(ext) = &file.golden_extension {
            self.golden_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(exts) = &file.extensions {
            self.extensions = exts.iter().map(|e| e.trim_start_matches('.').to_string()).collect();
        }
    }

    pub fn worker_count(&self) -> usize {
        match self.jobs {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        }
    }

    /// The golden file that belongs to `source`.
    pub fn golden_path(&self, source: &Path) -> PathBuf {
        source.with_extension(&self.golden_extension)
    }

    pub fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x == e))
    }
}

/// Contents of `jparse.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub jobs: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub recover: Option<bool>,
    pub golden_extension: Option<String>,
    pub extensions: Option<Vec<String>>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::parse(&content).map_err(|msg| HarnessError::config(path, msg))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| format!("invalid syntax: {e}"))?;
        if file.golden_extension.as_deref().is_some_and(|e| e.trim_start_matches('.').is_empty()) {
            return Err("golden_extension must not be empty".to_string());
        }
        if let Some(exts) = &file.extensions {
            if exts.is_empty() {
                return Err("extensions must list at least one extension".to_string());
            }
            let golden = file.golden_extension.as_deref().unwrap_or("golden").trim_start_matches('.');
            if exts.iter().any(|e| e.trim_start_matches('.') == golden) {
                return Err(format!("golden extension `{golden}` is also a source extension"));
            }
        }
        Ok(file)
    }
}
