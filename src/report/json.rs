//! Structured report assembly and persistence.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::error::{CheckError, ReportWriteError};
use crate::types::{FieldResult, OverallStatus, SystemIdentity, ValidationReport};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Aggregates field results, or a collaborator failure, into a report.
pub fn build(
    identity: Option<&SystemIdentity>,
    field_results: Vec<FieldResult>,
    error: Option<&CheckError>,
) -> ValidationReport {
    let now = Utc::now();

    let (overall_status, failure_reason) = match error {
        Some(err) => (OverallStatus::Error, Some(err.to_string())),
        None => match field_results.iter().find(|r| !r.passed) {
            Some(first) => (OverallStatus::Fail, Some(describe_mismatch(first))),
            None => (OverallStatus::Pass, None),
        },
    };

    ValidationReport {
        report_id: format!("validation_report_{}", now.format("%Y%m%dT%H%M%S%.3fZ")),
        engine_version: ENGINE_VERSION.to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        system_model: identity.map(|i| i.model.clone()),
        overall_status,
        field_results,
        failure_reason,
    }
}

fn describe_mismatch(result: &FieldResult) -> String {
    if result.field_name.ends_with("_firmware") {
        format!(
            "{}: version '{}' is not approved (approved: {})",
            result.field_name, result.actual, result.expected
        )
    } else {
        format!(
            "{}: expected '{}', found '{}'",
            result.field_name, result.expected, result.actual
        )
    }
}

/// Overwrites `path` with the report, via a sibling temp file and rename.
pub fn write(report: &ValidationReport, path: &Path) -> Result<(), ReportWriteError> {
    let body = serde_json::to_string_pretty(report)?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let io_err = |source| ReportWriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, body + "\n").map_err(io_err)?;
    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(source));
    }

    info!(path = %path.display(), status = %report.overall_status, "wrote validation report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::path::PathBuf;

    fn identity() -> SystemIdentity {
        SystemIdentity {
            model: "SYS-X".to_string(),
        }
    }

    fn pass(name: &str) -> FieldResult {
        FieldResult::compare(name, "a", "a")
    }

    fn fail(name: &str) -> FieldResult {
        FieldResult::compare(name, "a", "b")
    }

    #[test]
    fn all_passing_is_pass_without_reason() {
        let report = build(Some(&identity()), vec![pass("gpu_vendor"), pass("gpu_model")], None);
        assert_eq!(report.overall_status, OverallStatus::Pass);
        assert!(report.failure_reason.is_none());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn first_failing_field_is_the_reason() {
        let results = vec![pass("gpu_vendor"), fail("gpu_count"), fail("gpu_1_firmware")];
        let report = build(Some(&identity()), results, None);
        assert_eq!(report.overall_status, OverallStatus::Fail);
        assert_eq!(report.failure_reason.as_deref(), Some("gpu_count: expected 'a', found 'b'"));
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn firmware_reason_lists_approved_versions() {
        let result = FieldResult {
            field_name: "gpu_0_firmware".to_string(),
            expected: "96.00.41".to_string(),
            actual: "96.00.40".to_string(),
            passed: false,
        };
        let report = build(Some(&identity()), vec![result], None);
        let reason = report.failure_reason.unwrap();
        assert!(reason.starts_with("gpu_0_firmware"));
        assert!(reason.contains("96.00.40"));
    }

    #[test]
    fn collaborator_error_wins_over_results() {
        let err = CheckError::Config(ConfigError::Missing {
            path: PathBuf::from("/etc/gpucheck/golden_config.yml"),
        });
        let report = build(None, Vec::new(), Some(&err));
        assert_eq!(report.overall_status, OverallStatus::Error);
        assert_eq!(report.system_model, None);
        assert!(report
            .failure_reason
            .unwrap()
            .contains("/etc/gpucheck/golden_config.yml"));
    }

    #[test]
    fn write_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        fs::write(&path, "stale").unwrap();

        let report = build(Some(&identity()), vec![fail("gpu_model")], None);
        write(&report, &path).unwrap();

        let parsed: ValidationReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, report);
        assert!(!dir.path().join("report.json.tmp").exists());
    }

    #[test]
    fn pass_report_omits_failure_reason_key() {
        let report = build(Some(&identity()), vec![pass("gpu_model")], None);
        let value: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert!(value.get("failure_reason").is_none());
        assert_eq!(value["overall_status"], "PASS");
        assert_eq!(value["system_model"], "SYS-X");
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("report.json");
        let report = build(Some(&identity()), Vec::new(), None);
        assert!(matches!(write(&report, &path), Err(ReportWriteError::Io { .. })));
    }
}
