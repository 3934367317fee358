//! Shared data types for the probe, profile, validation and report stages.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// GPU vendor, as declared in a golden profile or detected on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuVendor {
    Nvidia,
    Amd,
    #[serde(other)]
    Unknown,
}

impl GpuVendor {
    pub fn as_str(self) -> &'static str {
        match self {
            GpuVendor::Nvidia => "nvidia",
            GpuVendor::Amd => "amd",
            GpuVendor::Unknown => "unknown",
        }
    }
}

impl fmt::Display for GpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the machine under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemIdentity {
    pub model: String,
}

/// Normalized hardware attributes read from the vendor inventory tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedHardware {
    pub gpu_vendor: GpuVendor,
    pub gpu_model: String,
    pub gpu_count: usize,
    /// One entry per detected GPU, in the tool's enumeration order.
    pub firmware_versions: Vec<String>,
}

impl ProbedHardware {
    /// Hardware state of a host with no supported accelerator tool installed.
    pub fn none_detected() -> Self {
        Self {
            gpu_vendor: GpuVendor::Unknown,
            gpu_model: String::new(),
            gpu_count: 0,
            firmware_versions: Vec::new(),
        }
    }
}

/// Expected hardware for one system model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenProfile {
    pub expected_gpu_vendor: GpuVendor,
    pub expected_gpu_model: String,
    pub expected_gpu_count: usize,
    pub approved_firmware_versions: BTreeSet<String>,
}

/// Outcome of comparing a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResult {
    pub field_name: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

impl FieldResult {
    pub fn compare(field_name: impl Into<String>, expected: impl ToString, actual: impl ToString) -> Self {
        let expected = expected.to_string();
        let actual = actual.to_string();
        Self {
            field_name: field_name.into(),
            passed: expected == actual,
            expected,
            actual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    Pass,
    Fail,
    Error,
}

impl OverallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OverallStatus::Pass => "PASS",
            OverallStatus::Fail => "FAIL",
            OverallStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The report document consumed by downstream monitoring.
///
/// Field names and status values are a stable external contract; only
/// additive changes are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub report_id: String,
    pub engine_version: String,
    pub timestamp: String,
    pub system_model: Option<String>,
    pub overall_status: OverallStatus,
    pub field_results: Vec<FieldResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl ValidationReport {
    /// Process exit status: FAIL and ERROR both collapse to 1.
    pub fn exit_code(&self) -> u8 {
        match self.overall_status {
            OverallStatus::Pass => 0,
            OverallStatus::Fail | OverallStatus::Error => 1,
        }
    }
}
