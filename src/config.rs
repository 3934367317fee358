//! Run settings supplied by the deployment environment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/gpucheck/golden_config.yml";
pub const DEFAULT_REPORT_PATH: &str = "/var/log/gpucheck/validation_report.json";
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub config_path: PathBuf,
    pub report_path: PathBuf,
    /// Upper bound on each external tool invocation.
    pub tool_timeout: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }
}
