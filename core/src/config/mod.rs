//! Minimal configuration module for toolsmith core
//!
//! Only exports pure data types. All loading logic is in the CLI layer.

pub mod types;

pub use types::{ModelParams, Protocol, ResolvedLlmConfig};
