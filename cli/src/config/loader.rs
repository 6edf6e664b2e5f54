//! Simple CLI configuration loader for toolsmith
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./toolsmith.json or ./.toolsmith/config.json
//! 3. XDG config: $XDG_CONFIG_HOME/toolsmith/config.json or ~/.config/toolsmith/config.json
//! 4. Environment variables only (no files)
//! 5. Built-in local default (Ollama on localhost)

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toolsmith_core::{ModelParams, Protocol, ResolvedLlmConfig};

/// Raw configuration file format (simple single-file schema)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConfig {
    /// Protocol to use ("ollama" or "openai_compat")
    pub protocol: String,
    /// API key (can be "env:VAR_NAME" for environment variable)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL (optional, uses protocol default if not specified)
    pub base_url: Option<String>,
    /// Model name
    pub model: String,
    /// Model parameters (optional)
    #[serde(default)]
    pub params: ModelParams,
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    protocol_override: Option<String>,
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    model_override: Option<String>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            protocol_override: None,
            api_key_override: None,
            base_url_override: None,
            model_override: None,
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set protocol override
    pub fn with_protocol_override(mut self, protocol: String) -> Self {
        self.protocol_override = Some(protocol);
        self
    }

    /// Set API key override
    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set model override
    pub fn with_model_override(mut self, model: String) -> Self {
        self.model_override = Some(model);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ResolvedLlmConfig> {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            let expanded = shellexpand::tilde(&override_path.to_string_lossy()).into_owned();
            let expanded = PathBuf::from(expanded);
            self.load_from_path(&expanded).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    expanded.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        // Step 2: Apply flag overrides
        if let Some(protocol) = &self.protocol_override {
            config.protocol = protocol.clone();
        }
        if let Some(api_key) = &self.api_key_override {
            config.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model_override {
            config.model = model.clone();
        }

        // Step 3: Resolve to final LLM config
        self.resolve_config(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        if let Some(config) = self.try_load_cwd().await? {
            return Ok(config);
        }

        if let Some(config) = self.try_load_xdg().await? {
            return Ok(config);
        }

        Ok(self.load_env_or_default())
    }

    /// Try loading from current working directory
    async fn try_load_cwd(&self) -> Result<Option<RawConfig>> {
        let cwd = std::env::current_dir()?;

        // Try ./toolsmith.json first
        let top_level = cwd.join("toolsmith.json");
        if top_level.exists() {
            return Ok(Some(self.load_file(&top_level).await?));
        }

        // Try ./.toolsmith/config.json
        let dotted = cwd.join(".toolsmith").join("config.json");
        if dotted.exists() {
            return Ok(Some(self.load_file(&dotted).await?));
        }

        Ok(None)
    }

    /// Try loading from XDG config directory
    async fn try_load_xdg(&self) -> Result<Option<RawConfig>> {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("toolsmith").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }
        Ok(None)
    }

    /// Build a config from environment variables, falling back to the
    /// built-in local Ollama default when nothing is set
    fn load_env_or_default(&self) -> RawConfig {
        let protocol = std::env::var("TOOLSMITH_PROTOCOL")
            .unwrap_or_else(|_| Protocol::Ollama.as_str().to_string());
        let base_url = std::env::var("TOOLSMITH_BASE_URL")
            .ok()
            .or_else(|| std::env::var("OLLAMA_HOST").ok());
        let model = std::env::var("TOOLSMITH_MODEL")
            .unwrap_or_else(|_| ResolvedLlmConfig::local_default().model);
        let api_key = std::env::var("TOOLSMITH_API_KEY").ok();

        RawConfig {
            protocol,
            api_key,
            base_url,
            model,
            params: ResolvedLlmConfig::local_default().params,
        }
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve raw config to ResolvedLlmConfig
    fn resolve_config(&self, config: RawConfig) -> Result<ResolvedLlmConfig> {
        let protocol = match config.protocol.as_str() {
            "ollama" => Protocol::Ollama,
            "openai_compat" | "openai" => Protocol::OpenAICompat,
            other => return Err(anyhow!("Unknown protocol: {}", other)),
        };

        // Resolve API key (handle env: prefix)
        let api_key = match config.api_key {
            Some(raw) if raw.starts_with("env:") => {
                let var_name = &raw[4..];
                Some(
                    std::env::var(var_name)
                        .with_context(|| format!("Environment variable not found: {}", var_name))?,
                )
            }
            other => other,
        };

        let base_url = config
            .base_url
            .unwrap_or_else(|| protocol.default_base_url().to_string());

        let mut resolved = ResolvedLlmConfig::new(protocol, base_url, config.model);
        resolved.api_key = api_key;
        resolved.params = config.params;

        resolved
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(resolved)
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
