//! Field-by-field comparison of probed hardware against golden profiles.

pub mod validator;

pub use validator::{validator_for, AmdValidator, GpuValidator, NvidiaValidator};
