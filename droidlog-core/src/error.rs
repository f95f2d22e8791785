use std::io;
use std::time::Duration;
use thiserror::Error;

/// failures of the short-lived adb queries (device list, pid lookup)
#[derive(Debug, Error)]
pub enum DeviceQueryError {
    #[error("'{program}' not found in PATH")]
    AdbNotFound { program: String },

    #[error("'{command}' did not finish within {}s", .after.as_secs())]
    TimedOut { command: String, after: Duration },

    #[error("'{command}' was killed by a signal")]
    Killed { command: String },

    #[error("'{command}' failed with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to run '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl DeviceQueryError {
    /// a user-facing suggestion for fixing the problem
    pub fn hint(&self) -> &'static str {
        match self {
            Self::AdbNotFound { .. } => {
                "Install Android SDK Platform-Tools and make sure 'adb' is on your PATH \
                 (macOS: brew install android-platform-tools, \
                 Debian/Ubuntu: apt-get install android-tools-adb), \
                 or point --adb at the binary."
            }
            Self::TimedOut { .. } => {
                "The adb server is not responding. Try 'adb kill-server && adb start-server' \
                 and reconnect the device."
            }
            Self::Killed { .. } => {
                "adb was terminated before answering. Check that no other tool is restarting \
                 the adb server."
            }
            Self::Failed { .. } | Self::Io { .. } => {
                "Check the device connection and run 'adb devices' manually for details."
            }
        }
    }
}

/// the log producer could not be started
#[derive(Debug, Error)]
#[error("failed to launch '{program}': {source}")]
pub struct LaunchError {
    pub program: String,
    #[source]
    pub source: io::Error,
}

impl LaunchError {
    pub fn is_not_found(&self) -> bool {
        self.source.kind() == io::ErrorKind::NotFound
    }
}

/// the producer failed after it was launched
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("log producer exited with {status}")]
    Exited { status: String },

    #[error("failed to read log producer output: {0}")]
    Read(#[source] io::Error),

    #[error("failed to wait for log producer: {0}")]
    Wait(#[source] io::Error),

    #[error("failed to write to the display: {0}")]
    Display(#[source] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("package name is empty")]
    Empty,

    #[error("package name is {len} characters long (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("package name must start with a letter, found '{0}'")]
    InvalidStart(char),

    #[error("package name may only contain letters, digits, '.', '_' and '-', found '{0}'")]
    InvalidCharacter(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("another session already holds the interrupt handler")]
    InterruptSlotTaken,

    #[error("session is already armed")]
    AlreadyArmed,

    #[error("session was torn down and cannot be armed again")]
    TornDown,
}
