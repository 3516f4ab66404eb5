// src/config/validate.rs

//! Session validation: runs before any process is spawned and has no side
//! effects beyond the returned error.

use std::path::{Path, PathBuf};

use crate::config::model::{ExecutionSession, RawSession};
use crate::errors::{PyrunError, Result};

impl TryFrom<RawSession> for ExecutionSession {
    type Error = PyrunError;

    fn try_from(raw: RawSession) -> std::result::Result<Self, Self::Error> {
        let interpreter = resolve_interpreter(&raw.interpreter)?;
        ensure_script_exists(&raw.script)?;

        Ok(ExecutionSession {
            interpreter,
            script: raw.script,
            search_paths: raw.search_paths,
            timeout_secs: raw.timeout_secs,
            env: raw.env,
        })
    }
}

/// Resolve the interpreter to an existing executable path.
///
/// - Empty string: rejected.
/// - A bare name (single path component, e.g. `"python3"`): looked up on
///   PATH.
/// - Anything with a separator: must exist on the filesystem as given.
fn resolve_interpreter(interpreter: &str) -> Result<PathBuf> {
    if interpreter.trim().is_empty() {
        return Err(PyrunError::Validation(
            "interpreter path must not be empty".to_string(),
        ));
    }

    let path = Path::new(interpreter);
    if path.components().count() == 1 {
        return which::which(interpreter).map_err(|err| {
            PyrunError::Validation(format!(
                "interpreter '{interpreter}' not found on PATH: {err}"
            ))
        });
    }

    if !path.exists() {
        return Err(PyrunError::Validation(format!(
            "interpreter path '{}' does not exist",
            path.display()
        )));
    }

    Ok(path.to_path_buf())
}

fn ensure_script_exists(script: &Path) -> Result<()> {
    if script.as_os_str().is_empty() {
        return Err(PyrunError::Validation(
            "script path must not be empty".to_string(),
        ));
    }
    if !script.exists() {
        return Err(PyrunError::Validation(format!(
            "script path '{}' does not exist",
            script.display()
        )));
    }
    Ok(())
}

/// Parse `KEY=VALUE;KEY2=VALUE2` pairs from the CLI `--env` flag.
///
/// - Empty segments (e.g. a trailing `;`) are skipped.
/// - A non-empty segment without `=`, or with an empty key, is rejected.
/// - Keys and values are trimmed of surrounding whitespace.
pub fn parse_env_pairs(text: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();

    for segment in text.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let Some((key, value)) = segment.split_once('=') else {
            return Err(PyrunError::Validation(format!(
                "environment pair '{segment}' is missing '='"
            )));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(PyrunError::Validation(format!(
                "environment pair '{segment}' has an empty key"
            )));
        }

        pairs.push((key.to_string(), value.trim().to_string()));
    }

    Ok(pairs)
}
