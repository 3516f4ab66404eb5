// src/supervisor/mod.rs

//! Process supervision layer.
//!
//! This module owns the lifecycle of one child process per session: it
//! builds the child's environment, spawns the interpreter, streams the
//! child's combined output line-by-line, enforces the timeout, and supports
//! cooperative stop via [`StopHandle`].
//!
//! - [`events`] defines the event stream contract: zero or more
//!   `RunEvent::Output` lines followed by exactly one
//!   `RunEvent::Finished(RunOutcome)`, always last.
//! - [`stop`] provides the idempotent stop flag shared with callers.
//! - [`runner`] contains the worker that actually drives the child process.
//!
//! One [`RunningSession`] supervises exactly one child; serializing
//! consecutive runs is the caller's job.

pub mod events;
pub mod runner;
pub mod stop;

pub use events::{RunEvent, RunOutcome};
pub use runner::{RunningSession, start};
pub use stop::StopHandle;
