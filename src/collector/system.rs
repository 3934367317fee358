//! System identity collector via dmidecode.

use crate::collector::command::CommandRunner;
use crate::error::ProbeError;
use crate::types::SystemIdentity;

pub const IDENTITY_TOOL: &str = "dmidecode";
const IDENTITY_ARGS: &[&str] = &["-t", "system"];
const MODEL_KEY: &str = "Product Name";

pub fn collect_identity(runner: &dyn CommandRunner) -> Result<SystemIdentity, ProbeError> {
    if !runner.is_available(IDENTITY_TOOL) {
        return Err(ProbeError::ToolMissing {
            tool: IDENTITY_TOOL.to_string(),
        });
    }

    let output = runner.run(IDENTITY_TOOL, IDENTITY_ARGS)?;
    let model = extract_value(&output, MODEL_KEY).ok_or_else(|| ProbeError::Malformed {
        tool: IDENTITY_TOOL.to_string(),
        reason: format!("no '{MODEL_KEY}' field"),
    })?;

    Ok(SystemIdentity { model })
}

/// First non-empty value for `key` in line-oriented `key: value` text.
fn extract_value(output: &str, key: &str) -> Option<String> {
    output
        .lines()
        .filter_map(|line| line.split_once(':'))
        .filter(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
