//! Validation pipeline: identify, look up, probe, validate, report.

use tracing::{debug, error, info};

use crate::analyzer::validator_for;
use crate::collector::HardwareProbe;
use crate::config::RunSettings;
use crate::error::{CheckError, ReportWriteError};
use crate::profile::GoldenProfileSet;
use crate::report;
use crate::types::{FieldResult, SystemIdentity, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Identify,
    Lookup,
    Probe,
    Validate,
    Report,
    Done,
}

fn enter(stage: Stage) {
    debug!(?stage, "entering stage");
}

/// Runs every stage up to report assembly without touching the report file.
///
/// A failure while identifying, looking up or probing skips validation and
/// yields an ERROR report.
pub fn evaluate(settings: &RunSettings, probe: &dyn HardwareProbe) -> ValidationReport {
    let mut identity = None;
    let outcome = compare(settings, probe, &mut identity);

    enter(Stage::Report);
    match outcome {
        Ok(results) => report::build(identity.as_ref(), results, None),
        Err(err) => {
            error!(error = %err, "validation could not be attempted");
            report::build(identity.as_ref(), Vec::new(), Some(&err))
        }
    }
}

fn compare(
    settings: &RunSettings,
    probe: &dyn HardwareProbe,
    identity: &mut Option<SystemIdentity>,
) -> Result<Vec<FieldResult>, CheckError> {
    enter(Stage::Identify);
    let id = identity.insert(probe.probe_identity().map_err(CheckError::Identity)?);
    info!(model = %id.model, "detected system model");

    enter(Stage::Lookup);
    let profiles = GoldenProfileSet::load(&settings.config_path)?;
    let expected = profiles.lookup(&id.model)?;
    let validator =
        validator_for(expected.expected_gpu_vendor).ok_or_else(|| CheckError::NoValidator {
            model: id.model.clone(),
            vendor: expected.expected_gpu_vendor,
        })?;
    info!(
        vendor = %expected.expected_gpu_vendor,
        model = %expected.expected_gpu_model,
        count = expected.expected_gpu_count,
        "loaded golden profile"
    );

    enter(Stage::Probe);
    let probed = probe.probe_hardware().map_err(CheckError::Hardware)?;
    info!(
        vendor = %probed.gpu_vendor,
        model = %probed.gpu_model,
        count = probed.gpu_count,
        "probed GPU inventory"
    );

    enter(Stage::Validate);
    Ok(validator.validate(&probed, expected))
}

/// Evaluates and persists the report. Only a failed write is an `Err`.
pub fn run(settings: &RunSettings, probe: &dyn HardwareProbe) -> Result<ValidationReport, ReportWriteError> {
    let report = evaluate(settings, probe);
    report::write(&report, &settings.report_path)?;
    enter(Stage::Done);
    Ok(report)
}
