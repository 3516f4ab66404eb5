// src/supervisor/runner.rs

//! The supervisor worker: one child process per session.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::config::ExecutionSession;
use crate::supervisor::events::{RunEvent, RunOutcome};
use crate::supervisor::stop::StopHandle;

/// Environment variable the interpreter reads for extra module search
/// directories.
const MODULE_PATH_VAR: &str = "PYTHONPATH";

/// How long to keep reading leftover pipe output after the child was killed.
/// A grandchild may hold the pipe open indefinitely; we stop waiting after
/// this.
const KILL_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// A session handed to [`start`]: the event stream plus the stop affordance.
///
/// The receiver yields `RunEvent::Output` lines as the child produces them
/// and ends with exactly one `RunEvent::Finished`.
pub struct RunningSession {
    events: mpsc::Receiver<RunEvent>,
    stop: StopHandle,
}

impl RunningSession {
    /// Next event, or `None` once the stream is exhausted (only after the
    /// terminal event has been yielded).
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Handle for requesting a cooperative stop from another task/thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

/// Start supervising one session on a background task.
///
/// Never blocks and never fails: spawn errors surface as a terminal
/// [`RunOutcome::Failed`] event on the returned stream.
pub fn start(session: ExecutionSession) -> RunningSession {
    let (tx, rx) = mpsc::channel::<RunEvent>(64);
    let stop = StopHandle::new();

    let worker_stop = stop.clone();
    tokio::spawn(async move {
        supervise(session, tx, worker_stop).await;
    });

    RunningSession { events: rx, stop }
}

async fn supervise(
    session: ExecutionSession,
    tx: mpsc::Sender<RunEvent>,
    stop: StopHandle,
) {
    let started = Instant::now();

    let outcome = match run_child(&session, &tx, &stop, started).await {
        Ok(outcome) => outcome,
        Err(err) => {
            let message = format!("{err:#}");
            warn!(error = %message, "supervisor error");
            RunOutcome::Failed { message }
        }
    };

    // Always the last event; the channel closes when `tx` drops here.
    let _ = tx.send(RunEvent::Finished(outcome)).await;
}

async fn run_child(
    session: &ExecutionSession,
    tx: &mpsc::Sender<RunEvent>,
    stop: &StopHandle,
    started: Instant,
) -> Result<RunOutcome> {
    if stop.is_requested() {
        debug!("stop requested before spawn; not starting child");
        return Ok(RunOutcome::Stopped);
    }

    info!(
        interpreter = %session.interpreter.display(),
        script = %session.script.display(),
        timeout_secs = session.timeout_secs,
        "starting script process"
    );

    let mut child = build_command(session).spawn().with_context(|| {
        format!(
            "spawning interpreter '{}'",
            session.interpreter.display()
        )
    })?;

    let pumps: Vec<JoinHandle<()>> = [
        spawn_line_pump(child.stdout.take(), tx.clone()),
        spawn_line_pump(child.stderr.take(), tx.clone()),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Stop takes precedence over the timeout, the timeout over normal exit.
    tokio::select! {
        biased;

        _ = stop.stopped() => {
            info!("stop requested; terminating script process");
            terminate(&mut child).await;
            drain_pumps(pumps, Some(KILL_DRAIN_GRACE)).await;
            Ok(RunOutcome::Stopped)
        }

        _ = sleep(Duration::from_secs(session.timeout_secs)),
            if session.timeout_secs > 0 =>
        {
            // Elapsed is taken at the deadline, not after the kill and
            // drain, so the reported time reflects the configured limit.
            let elapsed_secs = started.elapsed().as_secs_f64();
            warn!(
                timeout_secs = session.timeout_secs,
                "script exceeded timeout; terminating"
            );
            terminate(&mut child).await;
            drain_pumps(pumps, Some(KILL_DRAIN_GRACE)).await;
            Ok(RunOutcome::TimedOut { elapsed_secs })
        }

        status = child.wait() => {
            let status = status.context("waiting for interpreter process")?;

            // Late-flushed output must not be lost: the pumps run until the
            // pipes reach EOF, which happens after everything buffered has
            // been read.
            drain_pumps(pumps, None).await;

            let exit_code = status.code().unwrap_or(-1);
            let elapsed_secs = started.elapsed().as_secs_f64();
            info!(exit_code, elapsed_secs, "script process exited");

            Ok(RunOutcome::Completed { exit_code, elapsed_secs })
        }
    }
}

/// Build the child command: `interpreter -u script`, stdout/stderr piped,
/// and the session environment overlaid on the inherited one. The host
/// process environment is never mutated.
fn build_command(session: &ExecutionSession) -> Command {
    let mut cmd = Command::new(&session.interpreter);
    cmd.arg("-u").arg(&session.script);

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Explicit UTF-8 on the child's streams; undecodable bytes are replaced
    // on our side when reading.
    cmd.env("PYTHONIOENCODING", "utf-8");

    for (key, value) in &session.env {
        cmd.env(key, value);
    }

    if let Some(joined) = module_search_path(&session.search_paths) {
        cmd.env(MODULE_PATH_VAR, joined);
    }

    cmd
}

/// Session search paths joined with the platform separator, prepended to any
/// inherited value of the module search variable.
fn module_search_path(search_paths: &[PathBuf]) -> Option<OsString> {
    if search_paths.is_empty() {
        return None;
    }

    let mut entries: Vec<PathBuf> = search_paths.to_vec();
    if let Some(inherited) = env::var_os(MODULE_PATH_VAR) {
        entries.extend(env::split_paths(&inherited));
    }

    match env::join_paths(&entries) {
        Ok(joined) => Some(joined),
        Err(err) => {
            warn!(
                error = %err,
                "could not join module search paths; leaving {} inherited",
                MODULE_PATH_VAR
            );
            None
        }
    }
}

/// Pump one child pipe into the event channel, line by line.
///
/// Lines are split on `\n` as raw bytes and decoded lossily, so malformed
/// UTF-8 becomes U+FFFD instead of ending the stream. Trailing whitespace
/// (including `\r`) is stripped; empty lines are skipped.
fn spawn_line_pump<R>(
    pipe: Option<R>,
    tx: mpsc::Sender<RunEvent>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let pipe = pipe?;

    Some(tokio::spawn(async move {
        let reader = BufReader::new(pipe);
        let mut segments = reader.split(b'\n');

        loop {
            match segments.next_segment().await {
                Ok(Some(segment)) => {
                    let line = String::from_utf8_lossy(&segment);
                    let line = line.trim_end();
                    if line.is_empty() {
                        continue;
                    }
                    if tx.send(RunEvent::Output(line.to_string())).await.is_err() {
                        // Consumer went away; nothing left to report to.
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    debug!(error = %err, "output pipe read error");
                    break;
                }
            }
        }
    }))
}

/// Ask the child to die and reap it.
async fn terminate(child: &mut Child) {
    if let Err(err) = child.start_kill() {
        debug!(error = %err, "kill signal not delivered (child already gone?)");
    }
    if let Err(err) = child.wait().await {
        warn!(error = %err, "failed to reap script process");
    }
}

/// Wait for the pipe pumps to finish.
///
/// With `grace = None` this waits until EOF (normal-exit drain). On the kill
/// paths a bounded grace is used, and a pump that still hasn't seen EOF is
/// aborted and awaited so no `Output` can be sent after the terminal event.
async fn drain_pumps(pumps: Vec<JoinHandle<()>>, grace: Option<Duration>) {
    for mut pump in pumps {
        match grace {
            None => {
                let _ = (&mut pump).await;
            }
            Some(dur) => {
                if timeout(dur, &mut pump).await.is_err() {
                    pump.abort();
                    let _ = pump.await;
                }
            }
        }
    }
}
