use clap::Parser;
use droidlog_android::{
    DEFAULT_ADB_PROGRAM, DEFAULT_DEVICE_QUERY_TIMEOUT_MS, DEFAULT_PID_QUERY_TIMEOUT_MS,
    PipelineDesc,
};
use droidlog_core::Severity;
use droidlog_projects::DEFAULT_MAX_DEPTH;
use std::{path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(
    name = "droidlog",
    version,
    about = "Pick an Android app and stream its filtered, colorized logcat output"
)]
pub struct Cli {
    /// Package to stream, skipping the app picker
    #[arg(short, long, value_name = "PACKAGE")]
    pub package: Option<String>,

    /// Stream the package used last time
    #[arg(long, conflicts_with = "package")]
    pub last: bool,

    /// Minimum level: verbose, debug, info, warning, error, fatal (or V/D/I/W/E/F)
    #[arg(short, long, value_name = "LEVEL")]
    pub level: Option<Severity>,

    /// adb executable to use
    #[arg(long, value_name = "PATH", env = "DROIDLOG_ADB", default_value = DEFAULT_ADB_PROGRAM)]
    pub adb: String,

    /// Serial of the device to use when several are attached
    #[arg(short, long, value_name = "SERIAL")]
    pub serial: Option<String>,

    /// Seconds to wait for `adb devices`
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_DEVICE_QUERY_TIMEOUT_MS / 1000)]
    pub device_timeout: u64,

    /// Seconds to wait for the pid lookup
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_PID_QUERY_TIMEOUT_MS / 1000)]
    pub pid_timeout: u64,

    /// Remember an extra directory to scan for projects
    #[arg(long, value_name = "DIR")]
    pub add_scan_path: Vec<PathBuf>,

    /// Forget a previously added scan directory
    #[arg(long, value_name = "DIR")]
    pub remove_scan_path: Vec<PathBuf>,

    /// Print the discovered projects and exit
    #[arg(long)]
    pub list_projects: bool,

    /// How many directory levels to descend when scanning
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Forget the recently used apps
    #[arg(long)]
    pub clear_recent: bool,

    /// Print log lines without colors
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Show debug logging on stderr
    #[arg(long)]
    pub debug: bool,

    /// Also write droidlog's own debug log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Preferences file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE", env = "DROIDLOG_PREFERENCES")]
    pub preferences: Option<PathBuf>,
}

impl Cli {
    pub fn pipeline_desc(&self) -> PipelineDesc {
        let mut desc = PipelineDesc::new().with_serial(self.serial.clone());
        desc.adb_program = self.adb.clone();
        desc.device_query_timeout = Duration::from_secs(self.device_timeout);
        desc.pid_query_timeout = Duration::from_secs(self.pid_timeout);
        desc
    }
}
