// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod supervisor;

use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::{ExecutionSession, RawSession, parse_env_pairs};
use crate::errors::{PyrunError, Result};
use crate::supervisor::{RunEvent, RunOutcome};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - session construction (flags or a TOML run file) + validation
/// - the supervisor for one run
/// - Ctrl-C as the stop affordance
/// - stdout as the consumer of the output stream
///
/// Returns the process exit code to use.
pub async fn run(args: CliArgs) -> Result<i32> {
    let session = session_from_args(&args)?;

    let mut running = supervisor::start(session);

    // Ctrl-C requests a cooperative stop, standing in for a front end's
    // "stop" button. Idempotent, so repeated signals are harmless.
    {
        let stop = running.stop_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop.request_stop();
            }
        });
    }

    while let Some(event) = running.next_event().await {
        match event {
            RunEvent::Output(line) => println!("{line}"),
            RunEvent::Finished(outcome) => return Ok(report_outcome(outcome)),
        }
    }

    // The stream always ends with a terminal event; a closed channel without
    // one means the worker died abnormally.
    error!("event stream ended without a terminal outcome");
    Ok(1)
}

/// Build and validate the session from CLI input.
///
/// `--config` takes the whole run description from a TOML file; otherwise
/// the individual flags are used. Both funnel through the same validation.
fn session_from_args(args: &CliArgs) -> Result<ExecutionSession> {
    if let Some(path) = &args.config {
        return config::load_and_validate(path);
    }

    let script = args.script.clone().ok_or_else(|| {
        PyrunError::Validation(
            "a script path (or --config run file) is required".to_string(),
        )
    })?;

    let env = parse_env_pairs(args.env.as_deref().unwrap_or(""))?;

    let raw = RawSession {
        interpreter: args.interpreter.clone(),
        script,
        search_paths: args.search_paths.clone(),
        timeout_secs: args.timeout,
        env,
    };

    ExecutionSession::try_from(raw)
}

/// Log the terminal outcome and map it to a process exit code.
///
/// - `Completed` propagates the child's own exit code.
/// - `TimedOut` exits 124 and `Stopped` exits 130, the usual shell
///   conventions, so scripts wrapping pyrun can tell the cases apart.
fn report_outcome(outcome: RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Completed {
            exit_code,
            elapsed_secs,
        } => {
            info!(exit_code, elapsed_secs, "script finished");
            if exit_code < 0 { 1 } else { exit_code }
        }
        RunOutcome::TimedOut { elapsed_secs } => {
            error!(elapsed_secs, "script timed out and was terminated");
            124
        }
        RunOutcome::Stopped => {
            info!("script stopped on request");
            130
        }
        RunOutcome::Failed { message } => {
            error!(%message, "supervisor failure");
            1
        }
    }
}
