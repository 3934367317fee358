use std::collections::HashMap;
use std::fs;
use std::path::Path;

use gpucheck::collector::CommandRunner;
use gpucheck::config::RunSettings;
use gpucheck::error::ProbeError;

/// Runner that only knows the programs it was given.
#[derive(Default)]
pub struct ScriptedRunner {
    outputs: HashMap<&'static str, Result<String, String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(mut self, program: &'static str, stdout: &str) -> Self {
        self.outputs.insert(program, Ok(stdout.to_string()));
        self
    }

    /// Installed, but exits non-zero with `stderr`.
    pub fn failing_tool(mut self, program: &'static str, stderr: &str) -> Self {
        self.outputs.insert(program, Err(stderr.to_string()));
        self
    }

    pub fn system(self, model: &str) -> Self {
        let out = format!("System Information\n\tManufacturer: Supermicro\n\tProduct Name: {model}\n");
        self.tool("dmidecode", &out)
    }

    pub fn nvidia(self, model: &str, vbios: &[&str]) -> Self {
        let out: Vec<String> = vbios
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{i}, {model}, {v}"))
            .collect();
        self.tool("nvidia-smi", &out.join("\n"))
    }
}

impl CommandRunner for ScriptedRunner {
    fn is_available(&self, program: &str) -> bool {
        self.outputs.contains_key(program)
    }

    fn run(&self, program: &str, _args: &[&str]) -> Result<String, ProbeError> {
        match self.outputs.get(program) {
            Some(Ok(stdout)) => Ok(stdout.trim().to_string()),
            Some(Err(stderr)) => Err(ProbeError::ToolFailed {
                tool: program.to_string(),
                status: "exit status: 6".to_string(),
                stderr: stderr.clone(),
            }),
            None => Err(ProbeError::ToolMissing {
                tool: program.to_string(),
            }),
        }
    }
}

pub const GOLDEN: &str = r#"
SYS-X:
  expected_gpu_vendor: "nvidia"
  gpu_spec:
    expected_model: "GPU-A100"
    expected_count: 8
    expected_vbios_list:
      - "96.00.41"

SYS-8125GS-TNHR:
  expected_gpu_vendor: "amd"
  gpu_spec:
    expected_model: "AMD Instinct MI300X"
    expected_count: 2
    expected_vbios_list:
      - "113-M3000100-102"
      - "113-M3000100-103"
"#;

pub fn settings_with(dir: &Path, golden: Option<&str>) -> RunSettings {
    let config_path = dir.join("golden_config.yml");
    if let Some(doc) = golden {
        fs::write(&config_path, doc).unwrap();
    }
    RunSettings {
        config_path,
        report_path: dir.join("validation_report.json"),
        ..RunSettings::default()
    }
}
