//! Viewer configuration
//!
//! Loaded from an optional JSON file. Every field has a default, so a
//! partial file (or none at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ViewerError;
use crate::runtime::policy::Flavour;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Viewer flavour selecting the playback policy
    pub flavour: Flavour,
    /// Asset URL templating
    pub assets: AssetConfig,
    /// Display names for system speakers
    pub names: NameConfig,
    /// Background used when a story has none of its own
    pub default_background: Option<String>,
    /// How long banner notices stay up (milliseconds)
    pub banner_timeout_ms: u64,
    /// Delay between auto-advanced chat lines (milliseconds); `None` uses the flavour default
    pub auto_advance_ms: Option<u64>,
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            flavour: Flavour::Main,
            assets: AssetConfig::default(),
            names: NameConfig::default(),
            default_background: None,
            banner_timeout_ms: 4000,
            auto_advance_ms: None,
            log_level: "warn".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Load from a JSON file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ViewerError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ViewerError> {
        serde_json::from_str(content).map_err(|e| ViewerError::Config {
            message: e.to_string(),
        })
    }

    pub fn banner_timeout(&self) -> Duration {
        Duration::from_millis(self.banner_timeout_ms)
    }

    pub fn auto_advance_delay(&self) -> Option<Duration> {
        self.auto_advance_ms.map(Duration::from_millis)
    }
}

/// Asset URL templating: `{base_url}/{dir}/{name}{ext}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub base_url: String,
    pub background_dir: String,
    pub bgm_dir: String,
    pub se_dir: String,
    pub portrait_dir: String,
    pub image_ext: String,
    pub audio_ext: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://assets.example.invalid/azurlane".to_string(),
            background_dir: "bg".to_string(),
            bgm_dir: "bgm".to_string(),
            se_dir: "se".to_string(),
            portrait_dir: "squareicon".to_string(),
            image_ext: ".png".to_string(),
            audio_ext: ".ogg".to_string(),
        }
    }
}

/// Display names for speakers that are not roster characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameConfig {
    pub commander: String,
    pub narrator: String,
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            commander: "Commander".to_string(),
            narrator: "Narrator".to_string(),
        }
    }
}
