use crate::desc::PipelineDesc;
use droidlog_core::{LaunchError, Producer, ProducerEvent, StreamError};
use std::{future::pending, io, process::Stdio};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Split};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// program and arguments for one `adb logcat` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogcatInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl LogcatInvocation {
    /// `adb [-s serial] logcat -v time [--pid=<pid>]`
    pub fn new(desc: &PipelineDesc, pid: Option<&str>) -> Self {
        let mut args = desc.device_args();
        args.extend(["logcat", "-v", "time"].map(String::from));
        if let Some(pid) = pid {
            args.push(format!("--pid={pid}"));
        }

        Self {
            program: desc.adb_program.clone(),
            args,
        }
    }

    pub fn is_pid_scoped(&self) -> bool {
        self.args.iter().any(|arg| arg.starts_with("--pid="))
    }
}

/// a running `adb logcat` child with line readers on stdout and stderr
pub struct LogcatProcess {
    child: Option<Child>,
    stdout: Option<Split<BufReader<ChildStdout>>>,
    stderr: Option<Split<BufReader<ChildStderr>>>,
}

impl LogcatProcess {
    pub fn spawn(invocation: &LogcatInvocation) -> Result<Self, LaunchError> {
        log::debug!(
            "LogcatProcess: spawning {} {}",
            invocation.program,
            invocation.args.join(" ")
        );

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                log::error!("Failed to spawn {}: {}", invocation.program, source);
                LaunchError {
                    program: invocation.program.clone(),
                    source,
                }
            })?;

        let stdout = child.stdout.take().map(|out| BufReader::new(out).split(b'\n'));
        let stderr = child.stderr.take().map(|err| BufReader::new(err).split(b'\n'));

        Ok(Self {
            child: Some(child),
            stdout,
            stderr,
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().and_then(|child| child.id())
    }
}

/// one raw line as text; logcat output is not guaranteed to be valid UTF-8
fn decode_line(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

// a detached reader never yields, so select! simply skips it
async fn next_line<R>(lines: &mut Option<Split<R>>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    match lines {
        Some(lines) => Ok(lines.next_segment().await?.map(decode_line)),
        None => pending().await,
    }
}

impl Producer for LogcatProcess {
    async fn next_event(&mut self) -> ProducerEvent {
        loop {
            let Some(child) = self.child.as_mut() else {
                // released
                return pending().await;
            };
            let stdout_open = self.stdout.is_some();

            // stdout is drained before the exit status is looked at
            tokio::select! {
                biased;
                line = next_line(&mut self.stdout) => match line {
                    Ok(Some(line)) => return ProducerEvent::Line(line),
                    Ok(None) => {
                        log::debug!("LogcatProcess: stdout closed");
                        self.stdout = None;
                    }
                    Err(e) => {
                        self.stdout = None;
                        return ProducerEvent::Failed(StreamError::Read(e));
                    }
                },
                line = next_line(&mut self.stderr) => match line {
                    Ok(Some(line)) => return ProducerEvent::ErrorLine(line),
                    Ok(None) => self.stderr = None,
                    Err(e) => {
                        log::warn!("LogcatProcess: error reading stderr: {}", e);
                        self.stderr = None;
                    }
                },
                status = child.wait(), if !stdout_open => {
                    return match status {
                        Ok(status) => ProducerEvent::Exited {
                            success: status.success(),
                            status: status.to_string(),
                        },
                        Err(e) => ProducerEvent::Failed(StreamError::Wait(e)),
                    };
                }
            }
        }
    }

    fn release(&mut self) {
        log::debug!("LogcatProcess: releasing");

        // detach readers first so no further output is consumed
        self.stdout = None;
        self.stderr = None;

        if let Some(mut child) = self.child.take()
            && let Err(e) = child.start_kill()
        {
            // already reaped after a normal exit
            log::debug!("LogcatProcess: kill skipped: {}", e);
        }
    }
}
