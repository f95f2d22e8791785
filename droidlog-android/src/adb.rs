use crate::desc::PipelineDesc;
use droidlog_core::DeviceQueryError;
use std::{future::Future, io, process::Stdio, time::Duration};
use tokio::process::Command;

/// one entry of `adb devices`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub status: String,
}

/// connected devices; entries whose status is not exactly "device" are dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceList {
    pub connected: bool,
    pub count: usize,
    pub devices: Vec<Device>,
}

/// parse `adb devices` output: a header line, then `<id>\t<status>` lines
pub fn parse_devices(output: &str) -> DeviceList {
    let lines: Vec<&str> = output.lines().collect();

    // adb may print daemon startup chatter before the header
    let body = match lines
        .iter()
        .position(|line| line.trim_start().starts_with("List of devices"))
    {
        Some(header) => &lines[header + 1..],
        None => &lines[..],
    };

    let devices: Vec<Device> = body
        .iter()
        .filter_map(|line| {
            let (id, status) = line.split_once('\t')?;
            let (id, status) = (id.trim(), status.trim());
            if id.is_empty() || status != "device" {
                return None;
            }
            Some(Device {
                id: id.to_string(),
                status: status.to_string(),
            })
        })
        .collect();

    DeviceList {
        connected: !devices.is_empty(),
        count: devices.len(),
        devices,
    }
}

/// first token of `pidof` output if it looks like a pid
pub fn parse_pid(output: &str) -> Option<String> {
    let token = output.split_whitespace().next()?;
    if token.chars().all(|c| c.is_ascii_digit()) {
        Some(token.to_string())
    } else {
        None
    }
}

/// resolves the running process id of a package
pub trait PidLookup: Send + Sync {
    /// `Ok(None)` when the app is not running
    fn pid_of(
        &self,
        package: &str,
    ) -> impl Future<Output = Result<Option<String>, DeviceQueryError>> + Send;
}

/// short-lived adb queries with bounded run time
#[derive(Debug, Clone)]
pub struct AdbBridge {
    desc: PipelineDesc,
}

impl AdbBridge {
    pub fn new(desc: PipelineDesc) -> Self {
        Self { desc }
    }

    pub fn desc(&self) -> &PipelineDesc {
        &self.desc
    }

    /// `adb devices`, never scoped to a serial
    pub async fn devices(&self) -> Result<DeviceList, DeviceQueryError> {
        let output = self
            .query(&["devices".to_string()], self.desc.device_query_timeout)
            .await?;
        let list = parse_devices(&output);
        log::debug!("AdbBridge: {} device(s) connected", list.count);
        Ok(list)
    }

    async fn query(&self, args: &[String], limit: Duration) -> Result<String, DeviceQueryError> {
        let command = format!("{} {}", self.desc.adb_program, args.join(" "));
        log::debug!("AdbBridge: running '{}'", command);

        let child = Command::new(&self.desc.adb_program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    DeviceQueryError::AdbNotFound {
                        program: self.desc.adb_program.clone(),
                    }
                } else {
                    DeviceQueryError::Io {
                        command: command.clone(),
                        source,
                    }
                }
            })?;

        // dropping the output future on timeout kills the child
        let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(DeviceQueryError::Io { command, source }),
            Err(_) => {
                return Err(DeviceQueryError::TimedOut {
                    command,
                    after: limit,
                });
            }
        };

        if !output.status.success() {
            return Err(match output.status.code() {
                None => DeviceQueryError::Killed { command },
                Some(_) => DeviceQueryError::Failed {
                    command,
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl PidLookup for AdbBridge {
    async fn pid_of(&self, package: &str) -> Result<Option<String>, DeviceQueryError> {
        let mut args = self.desc.device_args();
        args.extend(["shell", "pidof", "-s", package].map(String::from));

        match self.query(&args, self.desc.pid_query_timeout).await {
            Ok(output) => Ok(parse_pid(&output)),
            // pidof exits 1 when nothing matches
            Err(DeviceQueryError::Failed { stderr, .. }) if stderr.is_empty() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
