//! Configuration for the CLI

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::LazyLock,
};

static CONFIG: LazyLock<PathBuf> = LazyLock::new(|| {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config/promptdeck.toml")
});

/// Configuration for the console.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// The model identifier
    pub model: String,

    /// The initial system prompt
    pub system_prompt: String,

    /// The API keys per provider
    pub key: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: gemini::DEFAULT_MODEL.into(),
            system_prompt: "You are a helpful assistant.".into(),
            key: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        if !CONFIG.as_path().exists() {
            return Ok(Self::default());
        }
        Self::load_from(CONFIG.as_path())
    }

    /// Load the configuration from the given path
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = toml::from_str(&std::fs::read_to_string(path)?)?;
        Ok(config)
    }

    /// Save the configuration to the file
    pub fn save(&self) -> Result<()> {
        self.save_to(CONFIG.as_path())
    }

    /// Save the configuration to the given path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string(self)?)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Resolve the Gemini API key.
    ///
    /// The environment variable wins; the config key table is the
    /// fallback. A missing key is a warning, not a hard failure — calls
    /// made without one fail at call time and degrade to a chat message.
    pub fn resolve_key(&self) -> String {
        std::env::var(gemini::KEY_ENV)
            .ok()
            .or_else(|| self.key.get("gemini").cloned())
            .unwrap_or_else(|| {
                tracing::warn!("{} not set, model calls will fail", gemini::KEY_ENV);
                String::new()
            })
    }
}
