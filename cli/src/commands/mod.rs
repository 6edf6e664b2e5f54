//! CLI command implementations

pub mod assist;
pub mod meta;
pub mod proof;
pub mod serve;
pub mod tools;

pub use assist::assist_command;
pub use meta::meta_command;
pub use proof::proof_command;
pub use serve::serve_command;
pub use tools::tools_command;
