use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

use pyrun::config::ExecutionSession;
use pyrun::supervisor::{RunEvent, RunningSession};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Write a shell script into `dir` and return its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

/// A session running `script` under `/bin/sh`.
///
/// `sh` stands in for the interpreter in tests: it takes the script path as
/// its argument and tolerates the `-u` unbuffered flag.
pub fn session_for(script: &Path) -> ExecutionSession {
    ExecutionSession {
        interpreter: PathBuf::from("/bin/sh"),
        script: script.to_path_buf(),
        search_paths: Vec::new(),
        timeout_secs: 0,
        env: Vec::new(),
    }
}

/// Drain the whole event stream, terminal event included.
pub async fn collect_events(mut running: RunningSession) -> Vec<RunEvent> {
    let mut events = Vec::new();
    while let Some(event) = running.next_event().await {
        events.push(event);
    }
    events
}

/// The `Output` lines of a collected event stream.
pub fn output_lines(events: &[RunEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            RunEvent::Output(line) => Some(line.clone()),
            RunEvent::Finished(_) => None,
        })
        .collect()
}
