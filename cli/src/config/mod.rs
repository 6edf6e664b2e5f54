//! CLI configuration handling

pub mod loader;

pub use loader::CliConfigLoader;
