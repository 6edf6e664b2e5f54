//! Tool manifest listing command

use anyhow::Result;
use chrono::{DateTime, Local};
use console::style;
use std::path::PathBuf;
use toolsmith_core::tools::builtin::human_size;
use toolsmith_core::tools::{Tool, ToolRegistry};
use tracing::info;

/// Show manifests in the tool directory plus the built-in handlers
pub async fn tools_command(tools_dir: PathBuf) -> Result<()> {
    info!("Listing tool manifests");

    let registry = ToolRegistry::new(tools_dir)?;

    println!("Tool directory: {}\n", registry.dir().display());

    let files = registry.manifest_files()?;
    if files.is_empty() {
        println!("No manifests found. Run the meta loop and 'bootstrap' to seed one.");
    }
    for path in files {
        let meta = std::fs::metadata(&path).ok();
        let size = meta
            .as_ref()
            .map(|m| human_size(m.len()))
            .unwrap_or_else(|| "?".to_string());
        let modified = meta
            .and_then(|m| m.modified().ok())
            .map(|t| {
                let stamp: DateTime<Local> = t.into();
                stamp.format("%Y-%m-%d %H:%M").to_string()
            })
            .unwrap_or_else(|| "unknown".to_string());

        match registry.load(&path) {
            Ok(tool) => {
                println!(
                    "{}  ({}, {})",
                    style(&tool.spec().name).cyan().bold(),
                    size,
                    modified
                );
                let first_line = tool
                    .spec()
                    .description
                    .lines()
                    .next()
                    .unwrap_or(&tool.spec().description);
                println!("   {}\n", first_line);
            }
            Err(e) => {
                println!("{}  ({})", style(path.display()).red().bold(), modified);
                println!("   unloadable: {}\n", e);
            }
        }
    }

    println!("Built-in handlers manifests may reference:");
    for name in registry.builtin_names() {
        println!("  {}", name);
    }

    Ok(())
}
