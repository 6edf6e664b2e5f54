//! Minimal configuration types for toolsmith core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in the CLI layer.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Supported LLM protocols
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Local Ollama HTTP API
    #[serde(rename = "ollama")]
    Ollama,
    /// OpenAI-compatible API (includes OpenAI, many proxies, hosted models)
    #[serde(rename = "openai_compat")]
    OpenAICompat,
}

impl Protocol {
    /// Get the protocol name as a string
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Ollama => "ollama",
            Protocol::OpenAICompat => "openai_compat",
        }
    }

    /// Get the default base URL for this protocol
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Protocol::Ollama => "http://127.0.0.1:11434",
            Protocol::OpenAICompat => "https://api.openai.com/v1",
        }
    }
}

/// Model parameters for LLM requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelParams {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature for sampling
    pub temperature: Option<f32>,
    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,
}

/// A fully resolved LLM configuration ready for use by core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLlmConfig {
    /// The protocol to use
    pub protocol: Protocol,
    /// Base URL for the API
    pub base_url: String,
    /// API key for authentication (unused by Ollama)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name/identifier
    pub model: String,
    /// Model parameters
    #[serde(default)]
    pub params: ModelParams,
}

impl ResolvedLlmConfig {
    /// Create a new resolved LLM config with protocol defaults
    pub fn new(protocol: Protocol, base_url: String, model: String) -> Self {
        Self {
            protocol,
            base_url,
            api_key: None,
            model,
            params: ModelParams::default(),
        }
    }

    /// Default local configuration: Ollama with the workshop model
    pub fn local_default() -> Self {
        let mut config = Self::new(
            Protocol::Ollama,
            Protocol::Ollama.default_base_url().to_string(),
            "llama3.1:8b".to_string(),
        );
        config.params.temperature = Some(0.3);
        config
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set model parameters
    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(ConfigError::MissingField {
                field: "model".to_string(),
            }
            .into());
        }

        let parsed = url::Url::parse(&self.base_url).map_err(|_| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            value: self.base_url.clone(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
            }
            .into());
        }

        if self.protocol == Protocol::OpenAICompat
            && self.api_key.as_deref().unwrap_or("").is_empty()
        {
            return Err(ConfigError::MissingField {
                field: "api_key".to_string(),
            }
            .into());
        }

        if let Some(temp) = self.params.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(ConfigError::InvalidValue {
                    field: "temperature".to_string(),
                    value: temp.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_default_validates() {
        ResolvedLlmConfig::local_default().validate().unwrap();
    }

    #[test]
    fn openai_compat_requires_api_key() {
        let config = ResolvedLlmConfig::new(
            Protocol::OpenAICompat,
            "https://api.openai.com/v1".to_string(),
            "gpt-4o-mini".to_string(),
        );
        assert!(config.validate().is_err());
        assert!(config
            .with_api_key("sk-test".to_string())
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = ResolvedLlmConfig::new(
            Protocol::Ollama,
            "ftp://localhost".to_string(),
            "llama3.1:8b".to_string(),
        );
        assert!(config.validate().is_err());
    }
}
