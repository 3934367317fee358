//! Vendor validators comparing probed hardware against a golden profile.

use tracing::{info, warn};

use crate::types::{FieldResult, GoldenProfile, GpuVendor, ProbedHardware};

/// Comparison rules for one GPU vendor.
///
/// Supporting a new vendor means adding a `GpuVendor` tag and one
/// implementation registered in [`VALIDATORS`]. Vendor-specific rules go in
/// an override of [`GpuValidator::validate`]; the default covers the common
/// vendor, model, count and firmware comparisons.
pub trait GpuValidator: Sync {
    fn vendor(&self) -> GpuVendor;

    /// Human name for the vendor's firmware image, used in log output.
    fn firmware_label(&self) -> &'static str;

    /// Compares every attribute; never short-circuits on a mismatch.
    fn validate(&self, probed: &ProbedHardware, expected: &GoldenProfile) -> Vec<FieldResult> {
        let mut results = vec![
            FieldResult::compare("gpu_vendor", expected.expected_gpu_vendor, probed.gpu_vendor),
            FieldResult::compare("gpu_model", &expected.expected_gpu_model, &probed.gpu_model),
            FieldResult::compare("gpu_count", expected.expected_gpu_count, probed.gpu_count),
        ];
        for r in &results {
            if r.passed {
                info!(field = %r.field_name, actual = %r.actual, "PASS");
            } else {
                warn!(field = %r.field_name, expected = %r.expected, actual = %r.actual, "FAIL");
            }
        }

        let approved = expected
            .approved_firmware_versions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        for (i, version) in probed.firmware_versions.iter().enumerate() {
            let passed = expected.approved_firmware_versions.contains(version);
            if passed {
                info!(gpu = i, %version, "{} approved", self.firmware_label());
            } else {
                warn!(gpu = i, %version, approved = %approved, "{} not approved", self.firmware_label());
            }
            results.push(FieldResult {
                field_name: format!("gpu_{i}_firmware"),
                expected: approved.clone(),
                actual: version.clone(),
                passed,
            });
        }

        results
    }
}

pub struct NvidiaValidator;

impl GpuValidator for NvidiaValidator {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Nvidia
    }

    fn firmware_label(&self) -> &'static str {
        "NVIDIA VBIOS"
    }
}

pub struct AmdValidator;

impl GpuValidator for AmdValidator {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Amd
    }

    fn firmware_label(&self) -> &'static str {
        "AMD VBIOS"
    }
}

pub static VALIDATORS: &[&dyn GpuValidator] = &[&NvidiaValidator, &AmdValidator];

/// Validator for the vendor a golden profile declares.
pub fn validator_for(vendor: GpuVendor) -> Option<&'static dyn GpuValidator> {
    VALIDATORS.iter().copied().find(|v| v.vendor() == vendor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn profile() -> GoldenProfile {
        GoldenProfile {
            expected_gpu_vendor: GpuVendor::Nvidia,
            expected_gpu_model: "GPU-A100".to_string(),
            expected_gpu_count: 8,
            approved_firmware_versions: BTreeSet::from(["96.00.41".to_string()]),
        }
    }

    fn matching() -> ProbedHardware {
        ProbedHardware {
            gpu_vendor: GpuVendor::Nvidia,
            gpu_model: "GPU-A100".to_string(),
            gpu_count: 8,
            firmware_versions: vec!["96.00.41".to_string(); 8],
        }
    }

    fn failing(results: &[FieldResult]) -> Vec<&str> {
        results.iter().filter(|r| !r.passed).map(|r| r.field_name.as_str()).collect()
    }

    #[test]
    fn dispatch_covers_concrete_vendors() {
        assert_eq!(validator_for(GpuVendor::Nvidia).unwrap().vendor(), GpuVendor::Nvidia);
        assert_eq!(validator_for(GpuVendor::Amd).unwrap().vendor(), GpuVendor::Amd);
        assert!(validator_for(GpuVendor::Unknown).is_none());
    }

    #[test]
    fn identical_hardware_passes_every_field() {
        let results = NvidiaValidator.validate(&matching(), &profile());
        assert_eq!(results.len(), 3 + 8);
        assert!(failing(&results).is_empty());
        assert_eq!(results[3].field_name, "gpu_0_firmware");
        assert_eq!(results[10].field_name, "gpu_7_firmware");
    }

    #[test]
    fn single_field_differences_fail_only_that_field() {
        let mut probed = matching();
        probed.gpu_model = "GPU-H100".to_string();
        assert_eq!(failing(&NvidiaValidator.validate(&probed, &profile())), vec!["gpu_model"]);

        let mut probed = matching();
        probed.firmware_versions[5] = "96.00.40".to_string();
        assert_eq!(failing(&NvidiaValidator.validate(&probed, &profile())), vec!["gpu_5_firmware"]);
    }

    #[test]
    fn count_mismatch_still_checks_detected_firmware() {
        let mut probed = matching();
        probed.gpu_count = 9;
        probed.firmware_versions.push("96.00.41".to_string());
        let results = NvidiaValidator.validate(&probed, &profile());
        assert_eq!(failing(&results), vec!["gpu_count"]);
        assert_eq!(results.len(), 3 + 9);
    }

    #[test]
    fn firmware_approval_is_set_membership() {
        let mut expected = profile();
        expected.approved_firmware_versions.insert("96.00.40".to_string());
        let mut probed = matching();
        probed.firmware_versions[0] = "96.00.40".to_string();
        assert!(failing(&NvidiaValidator.validate(&probed, &expected)).is_empty());

        // Newer is not approved.
        probed.firmware_versions[1] = "96.00.99".to_string();
        assert_eq!(failing(&NvidiaValidator.validate(&probed, &expected)), vec!["gpu_1_firmware"]);
    }

    #[test]
    fn vendor_mismatch_is_a_failing_field() {
        let mut probed = matching();
        probed.gpu_vendor = GpuVendor::Amd;
        let results = NvidiaValidator.validate(&probed, &profile());
        assert_eq!(failing(&results), vec!["gpu_vendor"]);
        assert_eq!(results[0].expected, "nvidia");
        assert_eq!(results[0].actual, "amd");
    }

    #[test]
    fn validation_is_deterministic() {
        let mut probed = matching();
        probed.firmware_versions[2] = "bad".to_string();
        let a = AmdValidator.validate(&probed, &profile());
        let b = AmdValidator.validate(&probed, &profile());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
