//! Producer and sink traits for log acquisition and display.
//!
//! This module defines the two seams of a streaming session:
//!
//! - [`Producer`]: an external process emitting raw log lines
//! - [`LineSink`]: where filtered, annotated lines and producer errors are shown
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   next_event()   ┌────────────────┐   admit()   ┌───────────────┐
//! │   Producer   │ ───────────────> │ ProducerEvent  │ ──────────> │ AnnotatedLine │
//! └──────────────┘                  └───────┬────────┘             └───────┬───────┘
//!                                           │ stderr                       │ emit()
//!                                           ▼                              ▼
//!                                    report_error()   ──────────>   ┌────────────┐
//!                                                                   │  LineSink  │
//!                                                                   └────────────┘
//! ```
//!
//! The producer only hands out raw lines; package scoping, severity
//! classification and colorizing all happen in [`crate::filter::LineFilter`].

use crate::{colorizer::AnnotatedLine, error::StreamError};
use std::future::Future;
use std::io;

/// One unit of output from a running producer.
#[derive(Debug)]
pub enum ProducerEvent {
    /// A line from standard output, without its trailing newline.
    Line(String),

    /// A line from standard error. Reported, never fatal on its own.
    ErrorLine(String),

    /// The process exited. `success` is false for a non-zero status or a signal.
    Exited { success: bool, status: String },

    /// The process could not be read from or waited on.
    Failed(StreamError),
}

/// A long-running external process emitting log lines.
///
/// # Contract
///
/// - `next_event()` **must be cancel-safe**: the session polls it inside
///   `tokio::select!` next to the interrupt registration, so a pending call may
///   be dropped and issued again without losing output.
/// - Events are delivered in the order the process produced them per stream.
/// - Once [`ProducerEvent::Exited`] or [`ProducerEvent::Failed`] is returned the
///   session stops polling.
///
/// # Release
///
/// `release()` kills the process and detaches the output readers. It is only
/// ever called by the [`Coordinator`](crate::coordinator::Coordinator), which
/// guarantees it runs at most once per session.
pub trait Producer: Send {
    /// Wait for the next line or lifecycle change.
    fn next_event(&mut self) -> impl Future<Output = ProducerEvent> + Send;

    /// Kill the process and drop its stream readers.
    fn release(&mut self);
}

/// Display side of a session.
pub trait LineSink {
    /// Show a line that passed the filter.
    ///
    /// # Errors
    ///
    /// A write failure (e.g. a closed pipe) ends the session.
    fn emit(&mut self, line: &AnnotatedLine) -> io::Result<()>;

    /// Show a line the producer wrote to standard error.
    fn report_error(&mut self, line: &str);
}
