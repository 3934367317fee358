//! Report building, persistence and console output.

pub mod json;
pub mod text;

pub use json::{build, write, ENGINE_VERSION};
