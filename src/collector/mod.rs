//! Hardware probing: system identity and GPU inventory.

pub mod command;
pub mod gpu;
pub mod system;

use tracing::info;

use crate::error::ProbeError;
use crate::types::{ProbedHardware, SystemIdentity};

pub use command::{CommandRunner, SystemCommandRunner};
pub use gpu::InventoryTool;

/// Source of the live hardware facts the pipeline validates.
pub trait HardwareProbe {
    fn probe_identity(&self) -> Result<SystemIdentity, ProbeError>;
    fn probe_hardware(&self) -> Result<ProbedHardware, ProbeError>;
}

/// Probes the host through its inventory tools.
pub struct Prober<R> {
    runner: R,
    tool: InventoryTool,
}

impl<R: CommandRunner> Prober<R> {
    /// Resolves the inventory tool once; later probes reuse the choice.
    pub fn new(runner: R) -> Self {
        let tool = InventoryTool::detect(&runner);
        info!(?tool, "resolved GPU inventory tool");
        Self { runner, tool }
    }

    pub fn inventory_tool(&self) -> InventoryTool {
        self.tool
    }
}

impl<R: CommandRunner> HardwareProbe for Prober<R> {
    fn probe_identity(&self) -> Result<SystemIdentity, ProbeError> {
        system::collect_identity(&self.runner)
    }

    fn probe_hardware(&self) -> Result<ProbedHardware, ProbeError> {
        gpu::collect_hardware(&self.runner, self.tool)
    }
}
