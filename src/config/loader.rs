// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ExecutionSession, RawSession, RunFile};
use crate::errors::Result;

/// Load a run file from a given path and return the raw `RawSession`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (paths existing, etc.). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSession> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let file: RunFile = toml::from_str(&contents)?;

    Ok(RawSession::from(file))
}

/// Load a run file from path and run session validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that the interpreter resolves to an existing executable and
///   that the script exists.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ExecutionSession> {
    let raw = load_from_path(&path)?;
    let session = ExecutionSession::try_from(raw)?;
    Ok(session)
}
