//! Thin agent wrapper: one named system prompt, one model call per ask.
//!
//! Every demo component takes an [`Agent`] by value at construction instead
//! of sharing a process-global model handle, so tests can inject a scripted
//! [`LlmClient`].

use crate::config::{Protocol, ResolvedLlmConfig};
use crate::error::Result;
use crate::llm::{LlmClient, LlmMessage, OllamaClient, OpenAiCompatClient};
use std::sync::Arc;
use tracing::debug;

/// A language-model-backed agent with a fixed system instruction
#[derive(Clone)]
pub struct Agent {
    name: String,
    client: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl Agent {
    /// Create a new agent
    pub fn new<S: Into<String>>(name: S, client: Arc<dyn LlmClient>, system_prompt: S) -> Self {
        Self {
            name: name.into(),
            client,
            system_prompt: system_prompt.into(),
        }
    }

    /// Agent name (used in routing logs)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send one user message and return the model's text reply, trimmed
    pub async fn ask(&self, text: &str) -> Result<String> {
        debug!(
            agent = %self.name,
            model = %self.client.model_name(),
            provider = %self.client.provider_name(),
            "agent call"
        );

        let messages = vec![
            LlmMessage::system(self.system_prompt.clone()),
            LlmMessage::user(text),
        ];

        let response = self.client.chat(messages, None).await?;
        Ok(response.message.content.trim().to_string())
    }
}

/// Build an LLM client for the configured protocol
pub fn build_client(config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>> {
    config.validate()?;

    let client: Arc<dyn LlmClient> = match config.protocol {
        Protocol::Ollama => Arc::new(OllamaClient::new(config)?),
        Protocol::OpenAICompat => Arc::new(OpenAiCompatClient::new(config)?),
    };

    Ok(client)
}
