//! Console summary of a validation report.

use crate::types::{OverallStatus, ValidationReport};

pub fn generate(report: &ValidationReport, report_path: &str) -> String {
    let mut out = String::new();
    let line = "─".repeat(72);

    out.push_str(&line);
    out.push('\n');
    out.push_str(&format!("  gpucheck v{} — GPU Golden Profile Validation\n", report.engine_version));
    out.push_str(&line);
    out.push('\n');
    out.push_str(&format!(
        "  System:    {}\n",
        report.system_model.as_deref().unwrap_or("Unknown")
    ));
    out.push_str(&format!("  Time:      {}\n", report.timestamp));
    out.push_str(&format!("  Report:    {}\n", report_path));
    out.push_str(&line);
    out.push('\n');

    out.push_str("\n== CHECKS ==\n\n");
    if report.field_results.is_empty() {
        out.push_str("  No checks performed.\n");
    } else {
        for r in &report.field_results {
            let tag = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!("  [{}] {:<18} {}\n", tag, r.field_name, r.actual));
            if !r.passed {
                out.push_str(&format!("         expected:          {}\n", r.expected));
            }
        }
    }
    out.push('\n');
    out.push_str(&line);
    out.push('\n');

    out.push_str(&format!("  FINAL RESULT: [{}]\n", report.overall_status));
    let system = report.system_model.as_deref().unwrap_or("this system");
    match report.overall_status {
        OverallStatus::Pass => {
            out.push_str(&format!("  System '{}' fully matches its golden profile.\n", system));
        }
        OverallStatus::Fail => {
            let failures = report.field_results.iter().filter(|r| !r.passed).count();
            out.push_str(&format!(
                "  System '{}' does NOT match its golden profile ({} failure(s)).\n",
                system, failures
            ));
        }
        OverallStatus::Error => {
            out.push_str("  Validation could not be performed.\n");
        }
    }
    if let Some(reason) = &report.failure_reason {
        out.push_str(&format!("  Reason: {}\n", reason));
    }
    out.push_str(&line);
    out.push('\n');

    out
}
