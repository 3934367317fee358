//! GPU inventory collector via nvidia-smi or rocm-smi.

use serde_json::Value;

use crate::collector::command::CommandRunner;
use crate::error::ProbeError;
use crate::types::{GpuVendor, ProbedHardware};

const NVIDIA_SMI: &str = "nvidia-smi";
const NVIDIA_ARGS: &[&str] = &["--query-gpu=index,name,vbios_version", "--format=csv,noheader"];

const ROCM_SMI: &str = "rocm-smi";
const ROCM_ARGS: &[&str] = &["--showproductname", "--showvbios", "--json"];
const ROCM_MODEL_KEY: &str = "Card series";
const ROCM_VBIOS_KEY: &str = "VBIOS version";

/// Which inventory tool this host offers, resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryTool {
    NvidiaSmi,
    RocmSmi,
    None,
}

/// Preference order: first-party tool, then alternate vendor.
const PREFERENCE: &[(&str, InventoryTool)] = &[
    (NVIDIA_SMI, InventoryTool::NvidiaSmi),
    (ROCM_SMI, InventoryTool::RocmSmi),
];

impl InventoryTool {
    pub fn detect(runner: &dyn CommandRunner) -> Self {
        PREFERENCE
            .iter()
            .find(|(program, _)| runner.is_available(program))
            .map(|(_, tool)| *tool)
            .unwrap_or(InventoryTool::None)
    }

    pub fn vendor(self) -> GpuVendor {
        match self {
            InventoryTool::NvidiaSmi => GpuVendor::Nvidia,
            InventoryTool::RocmSmi => GpuVendor::Amd,
            InventoryTool::None => GpuVendor::Unknown,
        }
    }
}

/// A single GPU as enumerated by its inventory tool.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GpuRecord {
    name: String,
    vbios: String,
}

pub fn collect_hardware(runner: &dyn CommandRunner, tool: InventoryTool) -> Result<ProbedHardware, ProbeError> {
    let records = match tool {
        InventoryTool::NvidiaSmi => parse_nvidia_csv(&runner.run(NVIDIA_SMI, NVIDIA_ARGS)?)?,
        InventoryTool::RocmSmi => parse_rocm_json(&runner.run(ROCM_SMI, ROCM_ARGS)?)?,
        InventoryTool::None => return Ok(ProbedHardware::none_detected()),
    };

    Ok(ProbedHardware {
        gpu_vendor: tool.vendor(),
        gpu_model: summarize_models(&records),
        gpu_count: records.len(),
        firmware_versions: records.into_iter().map(|r| r.vbios).collect(),
    })
}

/// Parses `index, name, vbios_version` lines in output order.
fn parse_nvidia_csv(output: &str) -> Result<Vec<GpuRecord>, ProbeError> {
    let mut records = Vec::new();

    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let fields: Vec<&str> = line.splitn(3, ',').map(str::trim).collect();
        if fields.len() < 3 || fields[1].is_empty() {
            return Err(ProbeError::Malformed {
                tool: NVIDIA_SMI.to_string(),
                reason: format!("expected 'index, name, vbios_version', got '{}'", line.trim()),
            });
        }
        records.push(GpuRecord {
            name: fields[1].to_string(),
            vbios: fields[2].to_string(),
        });
    }

    Ok(records)
}

/// Parses rocm-smi JSON, ordering cards by their numeric index.
fn parse_rocm_json(output: &str) -> Result<Vec<GpuRecord>, ProbeError> {
    let malformed = |reason: String| ProbeError::Malformed {
        tool: ROCM_SMI.to_string(),
        reason,
    };

    if output.trim().is_empty() {
        return Ok(Vec::new());
    }

    let root: Value = serde_json::from_str(output).map_err(|e| malformed(e.to_string()))?;
    let cards = root
        .as_object()
        .ok_or_else(|| malformed("top level is not an object".to_string()))?;

    let mut indexed = Vec::new();
    for (key, card) in cards {
        let Some(index) = key.strip_prefix("card").and_then(|n| n.parse::<u32>().ok()) else {
            continue;
        };
        let field = |name: &str| {
            card.get(name)
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .ok_or_else(|| malformed(format!("{key} has no '{name}'")))
        };
        indexed.push((
            index,
            GpuRecord {
                name: field(ROCM_MODEL_KEY)?,
                vbios: field(ROCM_VBIOS_KEY)?,
            },
        ));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, record)| record).collect())
}

/// Common model name, or every distinct name joined when the GPUs disagree.
fn summarize_models(records: &[GpuRecord]) -> String {
    let mut distinct: Vec<&str> = Vec::new();
    for record in records {
        if !distinct.contains(&record.name.as_str()) {
            distinct.push(&record.name);
        }
    }
    distinct.join(" | ")
}
