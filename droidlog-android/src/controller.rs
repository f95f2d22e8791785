use crate::{
    adb::{AdbBridge, PidLookup},
    desc::PipelineDesc,
    provider::{LogcatInvocation, LogcatProcess},
};
use droidlog_core::{InterruptSlot, LaunchError, PipelineSession, Severity};

/// builds and starts logcat sessions for a package
pub struct PipelineController<B: PidLookup = AdbBridge> {
    desc: PipelineDesc,
    bridge: B,
    slot: InterruptSlot,
}

impl PipelineController<AdbBridge> {
    pub fn new(desc: PipelineDesc) -> Self {
        let bridge = AdbBridge::new(desc.clone());
        Self::with_bridge(desc, bridge)
    }
}

impl<B: PidLookup> PipelineController<B> {
    pub fn with_bridge(desc: PipelineDesc, bridge: B) -> Self {
        Self {
            desc,
            bridge,
            slot: InterruptSlot::process(),
        }
    }

    pub fn with_slot(mut self, slot: InterruptSlot) -> Self {
        self.slot = slot;
        self
    }

    pub fn desc(&self) -> &PipelineDesc {
        &self.desc
    }

    /// pid of the running app, or `None` so the stream falls back to package filtering
    pub async fn resolve_pid(&self, package: &str) -> Option<String> {
        match self.bridge.pid_of(package).await {
            Ok(Some(pid)) => {
                log::debug!("PipelineController: {} is running as pid {}", package, pid);
                Some(pid)
            }
            Ok(None) => {
                log::warn!(
                    "{} is not running, showing all device logs that mention it",
                    package
                );
                None
            }
            Err(e) => {
                log::warn!(
                    "Could not look up the pid of {} ({}), falling back to package filtering",
                    package,
                    e
                );
                None
            }
        }
    }

    pub fn invocation(&self, pid: Option<&str>) -> LogcatInvocation {
        LogcatInvocation::new(&self.desc, pid)
    }

    /// Spawn logcat for `package`. The returned session still has to be armed.
    pub async fn start(
        &self,
        package: &str,
        min_severity: Severity,
    ) -> Result<PipelineSession<LogcatProcess>, LaunchError> {
        let pid = self.resolve_pid(package).await;
        let invocation = self.invocation(pid.as_deref());
        let process = LogcatProcess::spawn(&invocation)?;

        Ok(PipelineSession::new(
            package,
            pid,
            min_severity,
            process,
            self.slot.clone(),
        ))
    }
}
