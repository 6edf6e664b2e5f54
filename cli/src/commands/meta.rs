//! Meta-tooling REPL: grow the toolbox at runtime
//!
//! Free-form input goes to the tool builder agent; a handful of slash-free
//! commands manage the manifest directory directly. Every fault is reported
//! on one line and the loop continues.

use anyhow::Result;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use toolsmith_core::synthesis::{SynthesisOutcome, ToolSynthesizer, TOOL_BUILDER_SYSTEM_PROMPT};
use toolsmith_core::tools::{invoke_checked, Tool, ToolRegistry, ToolStatus, ToolUse};
use toolsmith_core::Agent;
use tracing::debug;

use crate::config::CliConfigLoader;

/// Start the meta-tooling loop
pub async fn meta_command(config_loader: CliConfigLoader, tools_dir: PathBuf) -> Result<()> {
    let llm_config = config_loader.load().await?;
    debug!(
        protocol = llm_config.protocol.as_str(),
        model = %llm_config.model,
        "meta loop starting"
    );

    let client = toolsmith_core::build_client(&llm_config)?;
    let agent = Agent::new("ToolBuilder", client, TOOL_BUILDER_SYSTEM_PROMPT);
    let registry = Arc::new(ToolRegistry::new(tools_dir)?);
    let synthesizer = ToolSynthesizer::new(agent, Arc::clone(&registry));

    println!(
        "{} manifests live in {}",
        style("toolsmith meta loop.").bold(),
        style(registry.dir().display()).cyan()
    );
    println!("Commands: list tools | bootstrap | load <file> | use <name> [input] | exit");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        if let Err(e) = handle_line(&synthesizer, &registry, line).await {
            println!("{} {}", style("error:").red().bold(), e);
        }
    }

    println!("bye");
    Ok(())
}

async fn handle_line(
    synthesizer: &ToolSynthesizer,
    registry: &ToolRegistry,
    line: &str,
) -> Result<()> {
    if line == "list tools" {
        list_manifests(registry)?;
        return Ok(());
    }
    if line == "bootstrap" {
        let (path, created) = registry.bootstrap()?;
        if created {
            println!("wrote starter manifest {}", path.display());
        } else {
            println!("starter manifest already present at {}", path.display());
        }
        return Ok(());
    }
    if let Some(target) = line.strip_prefix("load ") {
        let tool = registry.load_by_name(target.trim())?;
        println!("loaded tool '{}'", tool.spec().name);
        return Ok(());
    }
    if let Some(rest) = line.strip_prefix("use ") {
        let (name, input) = match rest.trim().split_once(' ') {
            Some((name, input)) => (name, input.trim()),
            None => (rest.trim(), ""),
        };
        run_tool(registry, name, input).await?;
        return Ok(());
    }

    // Anything else is a tool-building request
    match synthesizer.run(line).await? {
        SynthesisOutcome::NoMarker { response } => {
            println!("{}", response);
        }
        SynthesisOutcome::Loaded {
            path,
            tool,
            fallback_written,
            ..
        } => {
            if fallback_written {
                println!(
                    "{} recovered manifest from response body",
                    style("note:").yellow()
                );
            }
            println!(
                "{} '{}' at {}",
                style("tool created:").green().bold(),
                tool.spec().name,
                path.display()
            );
        }
        SynthesisOutcome::MissingCode {
            claimed, resolved, ..
        } => {
            println!(
                "{} model claimed '{}' but {} does not exist and no code block was found",
                style("incomplete:").yellow().bold(),
                claimed,
                resolved.display()
            );
        }
    }
    Ok(())
}

async fn run_tool(registry: &ToolRegistry, name: &str, input: &str) -> Result<()> {
    let tool = registry.load_by_name(name)?;
    let req = if input.is_empty() {
        ToolUse::new(serde_json::json!({}))
    } else {
        ToolUse::from_text(uuid::Uuid::new_v4().to_string(), input)
    };
    let result = invoke_checked(&tool, &req).await;
    let tag = match result.status {
        ToolStatus::Success => style("ok:").green().bold(),
        ToolStatus::Error => style("error:").red().bold(),
    };
    println!("{} {}", tag, result.text());
    Ok(())
}

fn list_manifests(registry: &ToolRegistry) -> Result<()> {
    let files = registry.manifest_files()?;
    if files.is_empty() {
        println!("no manifests yet; try 'bootstrap' or describe a tool to build");
        return Ok(());
    }
    for path in files {
        match registry.load(&path) {
            Ok(tool) => println!(
                "  {}  {}",
                style(&tool.spec().name).cyan(),
                tool.spec().description
            ),
            Err(e) => println!(
                "  {}  (unloadable: {})",
                style(path.display()).red(),
                e
            ),
        }
    }
    Ok(())
}
