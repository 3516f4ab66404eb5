// src/supervisor/events.rs

/// A single event observed from a running session.
///
/// For a given session, events are totally ordered: zero or more `Output`
/// events, then exactly one `Finished`, after which nothing else is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// One line of child output, trailing whitespace stripped. Lines from
    /// stdout and stderr arrive in this same stream.
    Output(String),

    /// Terminal outcome; always the last event for a session.
    Finished(RunOutcome),
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The child exited on its own.
    Completed { exit_code: i32, elapsed_secs: f64 },

    /// The child outlived `timeout_secs` and was terminated.
    TimedOut { elapsed_secs: f64 },

    /// [`super::StopHandle::request_stop`] was observed and the child was
    /// terminated. Neither a completion nor a failure.
    Stopped,

    /// The supervisor itself failed (e.g. the interpreter could not be
    /// spawned). The only error path out of a run.
    Failed { message: String },
}
