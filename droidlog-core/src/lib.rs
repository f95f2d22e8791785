//! # droidlog-core
//!
//! Filtering, colorizing and lifecycle management for a single streamed
//! device-log session.
//!
//! ## Overview
//!
//! A session wraps one long-running external log producer (for Android,
//! `adb logcat`). Every line it emits goes through the same pipeline:
//!
//! 1. **Package scope**: when the producer could not be scoped to the app's
//!    pid, lines must contain the package name
//! 2. **Severity**: lines must carry a marker (`" I/"`, `" E/"`, …) at or above
//!    the chosen minimum level
//! 3. **Colorizer**: the highest-priority marker found picks the display color
//!
//! ## Lifecycle
//!
//! The [`Coordinator`] owns the session's liveness flag and its interrupt
//! registration. Whatever stops the session first (ctrl-c, the producer
//! exiting, a broken display) triggers one teardown; every later trigger is a
//! no-op. Only one session per process may hold the interrupt handler, see
//! [`InterruptSlot`].
//!
//! ```rust,no_run
//! use droidlog_core::{InterruptSlot, PipelineSession, Severity};
//! # use droidlog_core::{AnnotatedLine, LineSink, Producer, ProducerEvent};
//! # struct MyProducer;
//! # impl Producer for MyProducer {
//! #     async fn next_event(&mut self) -> ProducerEvent { std::future::pending().await }
//! #     fn release(&mut self) {}
//! # }
//! # struct Stdout;
//! # impl LineSink for Stdout {
//! #     fn emit(&mut self, line: &AnnotatedLine) -> std::io::Result<()> { println!("{}", line.text); Ok(()) }
//! #     fn report_error(&mut self, line: &str) { eprintln!("{line}"); }
//! # }
//! # async fn demo() -> anyhow::Result<()> {
//! let mut session = PipelineSession::new(
//!     "com.example.app",
//!     None, // no pid: lines are narrowed by package name
//!     Severity::Warning,
//!     MyProducer,
//!     InterruptSlot::process(),
//! );
//! session.arm(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })?;
//! let reason = session.run(&mut Stdout).await?;
//! # Ok(())
//! # }
//! ```

pub mod colorizer;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod producer;
pub mod session;
pub mod severity;
pub mod text;
pub mod theme;
pub mod validation;

// re-export commonly used types
pub use colorizer::{AnnotatedLine, annotate};
pub use coordinator::{Coordinator, InterruptSlot, Phase, TeardownReason};
pub use error::{CoordinatorError, DeviceQueryError, LaunchError, StreamError, ValidationError};
pub use filter::LineFilter;
pub use producer::{LineSink, Producer, ProducerEvent};
pub use session::PipelineSession;
pub use severity::{Severity, UnknownSeverity, matches};
pub use validation::{MAX_PACKAGE_NAME_LEN, validate_package_name};
