//! gpucheck: validates a server's GPUs and firmware against a golden,
//! model-keyed hardware profile and emits a machine-readable report.

pub mod analyzer;
pub mod collector;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod types;
