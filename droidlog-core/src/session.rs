use crate::{
    coordinator::{Coordinator, InterruptSlot, Phase, TeardownReason},
    error::{CoordinatorError, StreamError},
    filter::LineFilter,
    producer::{LineSink, Producer, ProducerEvent},
    severity::Severity,
};
use std::future::Future;

/// One live producer invocation for one package.
///
/// Created by the controller, armed once, torn down once. A stopped session
/// is never restarted; streaming again needs a new session.
pub struct PipelineSession<P: Producer> {
    package: String,
    pid: Option<String>,
    filter: LineFilter,
    producer: P,
    coordinator: Coordinator,
}

impl<P: Producer> PipelineSession<P> {
    /// `pid` is the resolved process id; without one lines are narrowed by package name
    pub fn new(
        package: impl Into<String>,
        pid: Option<String>,
        min_severity: Severity,
        producer: P,
        slot: InterruptSlot,
    ) -> Self {
        let package = package.into();
        let filter = match &pid {
            Some(_) => LineFilter::scoped_by_pid(min_severity),
            None => LineFilter::unscoped(package.clone(), min_severity),
        };

        Self {
            package,
            pid,
            filter,
            producer,
            coordinator: Coordinator::new(slot),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn pid(&self) -> Option<&str> {
        self.pid.as_deref()
    }

    pub fn min_severity(&self) -> Severity {
        self.filter.min_severity()
    }

    pub fn filter(&self) -> &LineFilter {
        &self.filter
    }

    pub fn phase(&self) -> Phase {
        self.coordinator.phase()
    }

    pub fn is_live(&self) -> bool {
        self.coordinator.is_live()
    }

    /// Register the interrupt that stops this session.
    pub fn arm<F>(&mut self, interrupt: F) -> Result<(), CoordinatorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.coordinator.arm(interrupt)
    }

    /// Idempotent; returns whether this call did the release.
    pub fn teardown(&mut self, reason: TeardownReason) -> bool {
        self.coordinator.teardown(&mut self.producer, reason)
    }

    /// Stream producer output into `sink` until the session is torn down.
    ///
    /// Returns the reason for a graceful stop (interrupt or clean producer exit).
    /// A failing producer or display is torn down first, then reported as an error.
    pub async fn run<S>(&mut self, sink: &mut S) -> Result<TeardownReason, StreamError>
    where
        S: LineSink + ?Sized,
    {
        if let Some(reason) = self.coordinator.teardown_reason() {
            return Ok(reason);
        }

        log::debug!(
            "PipelineSession: streaming {} ({}, min level {})",
            self.package,
            self.pid
                .as_deref()
                .map(|pid| format!("pid {pid}"))
                .unwrap_or_else(|| "unscoped".to_string()),
            self.filter.min_severity()
        );

        loop {
            // the interrupt is polled first so nothing is shown after it fires
            let event = tokio::select! {
                biased;
                _ = self.coordinator.interrupted() => {
                    log::debug!("PipelineSession: interrupt received");
                    self.coordinator.teardown(&mut self.producer, TeardownReason::Interrupt);
                    return Ok(TeardownReason::Interrupt);
                }
                event = self.producer.next_event() => event,
            };

            match event {
                ProducerEvent::Line(line) => {
                    if let Some(annotated) = self.filter.admit(&line)
                        && let Err(e) = sink.emit(&annotated)
                    {
                        self.teardown(TeardownReason::DisplayFailed);
                        return Err(StreamError::Display(e));
                    }
                }
                ProducerEvent::ErrorLine(line) => {
                    log::debug!("logcat stderr: {}", line);
                    sink.report_error(&line);
                }
                ProducerEvent::Exited {
                    success: true,
                    status,
                } => {
                    log::debug!("PipelineSession: producer exited ({status})");
                    self.teardown(TeardownReason::ProducerExited);
                    return Ok(TeardownReason::ProducerExited);
                }
                ProducerEvent::Exited {
                    success: false,
                    status,
                } => {
                    log::error!("Log producer exited with {status}");
                    self.teardown(TeardownReason::ProducerFailed);
                    return Err(StreamError::Exited { status });
                }
                ProducerEvent::Failed(e) => {
                    log::error!("Log producer failed: {e}");
                    self.teardown(TeardownReason::ProducerFailed);
                    return Err(e);
                }
            }
        }
    }
}

impl<P: Producer> Drop for PipelineSession<P> {
    fn drop(&mut self) {
        self.teardown(TeardownReason::Dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorizer::AnnotatedLine;
    use std::{collections::VecDeque, future::pending, io};
    use tokio::sync::oneshot;

    /// replays a fixed script, then waits forever like a live logcat
    struct ScriptedProducer {
        script: VecDeque<ProducerEvent>,
        releases: usize,
    }

    impl ScriptedProducer {
        fn new(script: Vec<ProducerEvent>) -> Self {
            Self {
                script: script.into(),
                releases: 0,
            }
        }
    }

    impl Producer for ScriptedProducer {
        async fn next_event(&mut self) -> ProducerEvent {
            match self.script.pop_front() {
                Some(event) => event,
                None => pending().await,
            }
        }

        fn release(&mut self) {
            self.releases += 1;
            self.script.clear();
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        lines: Vec<AnnotatedLine>,
        errors: Vec<String>,
    }

    impl LineSink for CollectingSink {
        fn emit(&mut self, line: &AnnotatedLine) -> io::Result<()> {
            self.lines.push(line.clone());
            Ok(())
        }

        fn report_error(&mut self, line: &str) {
            self.errors.push(line.to_string());
        }
    }

    struct BrokenSink;

    impl LineSink for BrokenSink {
        fn emit(&mut self, _line: &AnnotatedLine) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn report_error(&mut self, _line: &str) {}
    }

    fn line(text: &str) -> ProducerEvent {
        ProducerEvent::Line(text.to_string())
    }

    fn exited(success: bool) -> ProducerEvent {
        ProducerEvent::Exited {
            success,
            status: if success { "exit status: 0" } else { "exit status: 1" }.to_string(),
        }
    }

    #[tokio::test]
    async fn test_clean_exit_delivers_filtered_lines_in_order() {
        let producer = ScriptedProducer::new(vec![
            line("01-01 00:00:00.000 D/ReactNativeJS( 42): render"),
            line("01-01 00:00:00.001 I/ReactNativeJS( 42): first"),
            line(""),
            line("01-01 00:00:00.002 E/ReactNativeJS( 42): second"),
            exited(true),
        ]);
        let mut session = PipelineSession::new(
            "com.example.app",
            Some("42".to_string()),
            Severity::Info,
            producer,
            InterruptSlot::new(),
        );
        session.arm(pending::<()>()).unwrap();

        let mut sink = CollectingSink::default();
        let reason = session.run(&mut sink).await.unwrap();

        assert_eq!(reason, TeardownReason::ProducerExited);
        let texts: Vec<&str> = sink.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "01-01 00:00:00.001 I/ReactNativeJS( 42): first",
                "01-01 00:00:00.002 E/ReactNativeJS( 42): second",
            ]
        );
        assert_eq!(session.producer.releases, 1);
        assert!(!session.is_live());
    }

    #[tokio::test]
    async fn test_unscoped_session_filters_by_package() {
        let producer = ScriptedProducer::new(vec![
            line("01-01 00:00:00.000 I/ActivityManager( 1): Start proc com.example.app"),
            line("01-01 00:00:00.000 I/ActivityManager( 1): Start proc com.other.app"),
            exited(true),
        ]);
        let mut session = PipelineSession::new(
            "com.example.app",
            None,
            Severity::Info,
            producer,
            InterruptSlot::new(),
        );
        assert_eq!(session.filter().package_scope(), Some("com.example.app"));
        session.arm(pending::<()>()).unwrap();

        let mut sink = CollectingSink::default();
        session.run(&mut sink).await.unwrap();

        assert_eq!(sink.lines.len(), 1);
        assert!(sink.lines[0].text.ends_with("com.example.app"));
    }

    #[tokio::test]
    async fn test_stderr_is_reported_without_stopping() {
        let producer = ScriptedProducer::new(vec![
            ProducerEvent::ErrorLine("- waiting for device -".to_string()),
            line("01-01 00:00:00.000 W/App( 7): still running"),
            exited(true),
        ]);
        let mut session = PipelineSession::new(
            "com.example.app",
            Some("7".into()),
            Severity::Verbose,
            producer,
            InterruptSlot::new(),
        );
        session.arm(pending::<()>()).unwrap();

        let mut sink = CollectingSink::default();
        session.run(&mut sink).await.unwrap();

        assert_eq!(sink.errors, vec!["- waiting for device -".to_string()]);
        assert_eq!(sink.lines.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_exit_tears_down_and_reports() {
        let slot = InterruptSlot::new();
        let producer = ScriptedProducer::new(vec![exited(false)]);
        let mut session = PipelineSession::new(
            "com.example.app",
            None,
            Severity::Info,
            producer,
            slot.clone(),
        );
        session.arm(pending::<()>()).unwrap();

        let mut sink = CollectingSink::default();
        let err = session.run(&mut sink).await.unwrap_err();

        assert!(matches!(err, StreamError::Exited { .. }));
        assert_eq!(session.producer.releases, 1);
        assert!(!slot.is_held());

        // a later teardown from another path is a no-op
        assert!(!session.teardown(TeardownReason::Interrupt));
        assert_eq!(session.producer.releases, 1);
    }

    #[tokio::test]
    async fn test_interrupt_wins_over_pending_output() {
        let (tx, rx) = oneshot::channel::<()>();
        let producer = ScriptedProducer::new(vec![
            line("01-01 00:00:00.000 E/App( 7): never shown"),
            line("01-01 00:00:00.001 E/App( 7): never shown either"),
        ]);
        let mut session = PipelineSession::new(
            "com.example.app",
            Some("7".into()),
            Severity::Verbose,
            producer,
            InterruptSlot::new(),
        );
        session
            .arm(async move {
                let _ = rx.await;
            })
            .unwrap();
        tx.send(()).unwrap();

        let mut sink = CollectingSink::default();
        let reason = session.run(&mut sink).await.unwrap();

        assert_eq!(reason, TeardownReason::Interrupt);
        assert!(sink.lines.is_empty());
        assert_eq!(session.producer.releases, 1);
    }

    #[tokio::test]
    async fn test_display_failure_ends_session() {
        let producer = ScriptedProducer::new(vec![line("01-01 00:00:00.000 E/App( 7): boom")]);
        let mut session = PipelineSession::new(
            "com.example.app",
            Some("7".into()),
            Severity::Info,
            producer,
            InterruptSlot::new(),
        );
        session.arm(pending::<()>()).unwrap();

        let err = session.run(&mut BrokenSink).await.unwrap_err();
        assert!(matches!(err, StreamError::Display(_)));
        assert_eq!(session.phase(), Phase::TornDown);
    }

    #[tokio::test]
    async fn test_run_after_teardown_returns_immediately() {
        let producer = ScriptedProducer::new(vec![line("01-01 00:00:00.000 E/App( 7): late")]);
        let mut session = PipelineSession::new(
            "com.example.app",
            Some("7".into()),
            Severity::Info,
            producer,
            InterruptSlot::new(),
        );
        session.arm(pending::<()>()).unwrap();
        session.teardown(TeardownReason::Interrupt);

        let mut sink = CollectingSink::default();
        assert_eq!(session.run(&mut sink).await.unwrap(), TeardownReason::Interrupt);
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn test_drop_releases_producer_slot() {
        let slot = InterruptSlot::new();
        {
            let mut session = PipelineSession::new(
                "com.example.app",
                None,
                Severity::Info,
                ScriptedProducer::new(Vec::new()),
                slot.clone(),
            );
            session.arm(pending::<()>()).unwrap();
            assert!(slot.is_held());
        }
        assert!(!slot.is_held());
    }
}
