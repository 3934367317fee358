//! Error taxonomy for the validation pipeline.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::GpuVendor;

/// Failure invoking or parsing an external inventory tool.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{tool} not found in PATH")]
    ToolMissing { tool: String },

    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} did not finish within {}s", timeout.as_secs())]
    Timeout { tool: String, timeout: Duration },

    #[error("unexpected {tool} output: {reason}")]
    Malformed { tool: String, reason: String },
}

/// Failure loading the golden profile document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("golden profile document not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read golden profile document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse golden profile document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A collaborator failure that prevents comparison from being attempted.
///
/// Every variant maps to an ERROR report; none of them is a FAIL.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("identity probe failed: {0}")]
    Identity(#[source] ProbeError),

    #[error("hardware probe failed: {0}")]
    Hardware(#[source] ProbeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("system model '{model}' is not defined in {}", path.display())]
    ModelNotFound { model: String, path: PathBuf },

    #[error("system model '{model}' declares vendor '{vendor}', which has no validator")]
    NoValidator { model: String, vendor: GpuVendor },
}

/// The report could not be persisted. Fatal for the run.
#[derive(Debug, Error)]
pub enum ReportWriteError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
