// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pyrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pyrun",
    version,
    about = "Run a script under an interpreter, streaming its output, with a timeout and Ctrl-C stop.",
    long_about = None
)]
pub struct CliArgs {
    /// Script to run.
    ///
    /// Required unless `--config` is given.
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Interpreter executable: a path, or a bare name resolved on PATH.
    #[arg(long, value_name = "EXE", default_value = "python3")]
    pub interpreter: String,

    /// Extra module search directory, prepended to the interpreter's module
    /// search path (PYTHONPATH). May be given multiple times; order is kept.
    #[arg(long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// Extra environment variables for the child, as `KEY=VALUE;KEY2=VALUE2`.
    ///
    /// These are applied to the child process only, never to pyrun itself.
    #[arg(long, value_name = "PAIRS")]
    pub env: Option<String>,

    /// Terminate the script after this many seconds. 0 means no limit.
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub timeout: u64,

    /// Read the whole run description from a TOML file instead of flags.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PYRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
