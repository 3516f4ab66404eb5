// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// One validated request to run a script: which interpreter, which script,
/// extra module search directories, a timeout, and extra environment for the
/// child process.
///
/// Immutable once built; construct it via `TryFrom<RawSession>` (or
/// [`crate::config::load_and_validate`] for TOML run files) so the
/// validation in `validate.rs` always runs first.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSession {
    /// Resolved path to the interpreter executable.
    pub interpreter: PathBuf,

    /// Path to the script handed to the interpreter as its argument.
    pub script: PathBuf,

    /// Directories prepended, in order, to the interpreter's module search
    /// path (PYTHONPATH).
    pub search_paths: Vec<PathBuf>,

    /// Wall-clock limit in seconds; 0 means unbounded.
    pub timeout_secs: u64,

    /// Extra environment variables, overlaid on the child's inherited
    /// environment. Never applied to the host process.
    pub env: Vec<(String, String)>,
}

/// An unvalidated run description, as collected from CLI flags or a run
/// file. `interpreter` is still a string here because a bare name (e.g.
/// `"python3"`) is only resolved against PATH during validation.
#[derive(Debug, Clone, Default)]
pub struct RawSession {
    pub interpreter: String,
    pub script: PathBuf,
    pub search_paths: Vec<PathBuf>,
    pub timeout_secs: u64,
    pub env: Vec<(String, String)>,
}

/// Top-level run description as read from a TOML file.
///
/// ```toml
/// [run]
/// interpreter = "/usr/bin/python3"
/// script = "jobs/report.py"
/// search_paths = ["lib", "vendor"]
/// timeout_secs = 30
///
/// [env]
/// REPORT_MODE = "full"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunFile {
    /// The `[run]` section.
    pub run: RunSection,

    /// Extra environment variables for the child from `[env]`.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// `[run]` section of a run file.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    /// Interpreter executable: a path, or a bare name resolved on PATH.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Script to run.
    pub script: PathBuf,

    /// Extra module search directories, prepended in order.
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Wall-clock limit in seconds; 0 (the default) means unbounded.
    #[serde(default)]
    pub timeout_secs: u64,
}

fn default_interpreter() -> String {
    "python3".to_string()
}

impl From<RunFile> for RawSession {
    fn from(file: RunFile) -> Self {
        RawSession {
            interpreter: file.run.interpreter,
            script: file.run.script,
            search_paths: file.run.search_paths,
            timeout_secs: file.run.timeout_secs,
            env: file.env.into_iter().collect(),
        }
    }
}
