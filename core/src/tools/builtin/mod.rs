//! Built-in tool handlers
//!
//! These are the statically registered handlers a generated tool manifest
//! may reference by name.

pub mod count_chars;
pub mod list_files;

pub use count_chars::CountChars;
pub use list_files::{human_size, ListFilesWithSizes};
