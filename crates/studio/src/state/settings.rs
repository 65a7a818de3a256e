//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::scene::DEFAULT_HISTORY_LIMIT;

/// Environment variable that replaces the assistant endpoint after loading
pub const ENDPOINT_ENV: &str = "CONCEIVIN_ASSISTANT_ENDPOINT";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// AI assistant connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Chat endpoint receiving `{messages, userId, app}`
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Prior messages sent as context with each request
    pub context_messages: usize,
    /// Identifier forwarded as `userId`
    pub user_id: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/ai-assistant".to_string(),
            timeout_secs: 30,
            context_messages: 5,
            user_id: "local".to_string(),
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Maximum retained history snapshots
    pub history_limit: usize,
    /// Colour of the initial object
    pub default_color: String,
    /// X offset applied to duplicates
    pub duplicate_offset: f64,
    pub assistant: AssistantSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_color: shared::DEFAULT_COLOR.to_string(),
            duplicate_offset: 0.5,
            assistant: AssistantSettings::default(),
        }
    }
}

impl EditorSettings {
    /// Default location of `settings.json`
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "conceivin3d", "studio")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config dir, or return defaults if missing or unreadable
    pub fn load() -> Self {
        let loaded = match Self::config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Ignoring settings at {}: {e}", path.display());
                    Self::default()
                }
            },
            _ => Self::default(),
        };
        loaded.with_env_overrides()
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save settings to the config dir
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Apply environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                tracing::info!("Assistant endpoint overridden by {ENDPOINT_ENV}");
                self.assistant.endpoint = endpoint.to_string();
            }
        }
        self
    }
}
