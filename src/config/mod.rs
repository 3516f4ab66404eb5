// src/config/mod.rs

//! Session model, loading and validation for pyrun.
//!
//! Responsibilities:
//! - Define the run description data model, including the TOML-backed run
//!   file (`model.rs`).
//! - Load a run file from disk (`loader.rs`).
//! - Validate a candidate session before anything is spawned (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ExecutionSession, RawSession, RunFile, RunSection};
pub use validate::parse_env_pairs;
