// droidlog-android - adb backed log producer for droidlog
//
// Device queries (`adb devices`, `pidof`) and the long-running `adb logcat`
// child process that feeds a droidlog-core session.

mod adb;
mod controller;
mod desc;
mod provider;

pub use adb::{AdbBridge, Device, DeviceList, PidLookup, parse_devices, parse_pid};
pub use controller::PipelineController;
pub use desc::{
    DEFAULT_ADB_PROGRAM, DEFAULT_DEVICE_QUERY_TIMEOUT_MS, DEFAULT_PID_QUERY_TIMEOUT_MS,
    PipelineDesc,
};
pub use provider::{LogcatInvocation, LogcatProcess};
