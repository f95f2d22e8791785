use std::time::Duration;

// constants
pub const DEFAULT_ADB_PROGRAM: &str = "adb";
pub const DEFAULT_DEVICE_QUERY_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PID_QUERY_TIMEOUT_MS: u64 = 5_000;

/// how to reach the device and how long the short-lived queries may take
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDesc {
    pub adb_program: String,
    /// passed as `adb -s <serial>` when several devices are attached
    pub serial: Option<String>,
    pub device_query_timeout: Duration,
    pub pid_query_timeout: Duration,
}

impl PipelineDesc {
    pub fn new() -> Self {
        Self {
            adb_program: DEFAULT_ADB_PROGRAM.to_string(),
            serial: None,
            device_query_timeout: Duration::from_millis(DEFAULT_DEVICE_QUERY_TIMEOUT_MS),
            pid_query_timeout: Duration::from_millis(DEFAULT_PID_QUERY_TIMEOUT_MS),
        }
    }

    pub fn with_serial(mut self, serial: Option<String>) -> Self {
        self.serial = serial;
        self
    }

    /// `-s <serial>` prefix for every adb command targeting the device
    pub fn device_args(&self) -> Vec<String> {
        match &self.serial {
            Some(serial) => vec!["-s".to_string(), serial.clone()],
            None => Vec::new(),
        }
    }
}

impl Default for PipelineDesc {
    fn default() -> Self {
        Self::new()
    }
}
