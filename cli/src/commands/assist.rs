//! Routed assistant REPL

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use toolsmith_core::Router;
use tracing::debug;

use crate::config::CliConfigLoader;

/// Start the routed question-answering loop
pub async fn assist_command(config_loader: CliConfigLoader) -> Result<()> {
    let llm_config = config_loader.load().await?;
    debug!(
        protocol = llm_config.protocol.as_str(),
        model = %llm_config.model,
        "assist loop starting"
    );

    let client = toolsmith_core::build_client(&llm_config)?;
    let router = Router::new(client);

    println!(
        "{} ask anything; 'exit' to leave",
        style("toolsmith assist.").bold()
    );

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"? ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == "exit" || query == "quit" {
            break;
        }

        match router.route(query).await {
            Ok((label, answer)) => {
                println!(
                    "{} {}",
                    style(format!("[{}]", label.assistant_name())).magenta(),
                    answer
                );
            }
            Err(e) => {
                println!("{} {}", style("error:").red().bold(), e);
            }
        }
    }

    println!("bye");
    Ok(())
}
