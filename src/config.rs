//! Client configuration loaded from `~/.config/trackerops/config.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ClientError, Result};

/// Default backend (json-server on the dev machine)
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Sample clip reviewed by the app
pub const DEFAULT_VIDEO_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

/// Runtime configuration. Every key is optional in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// REST backend root
    pub base_url: String,
    /// Directory holding the key-value store
    pub data_dir: PathBuf,
    /// Video under review
    pub video_url: String,
    /// Length reported for the video when no decoder is attached
    pub video_duration_secs: f64,
    /// How long a stroke stays on screen around its timestamp
    pub drawing_window_secs: f64,
    /// Author label stamped on new comments
    pub comment_author: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: default_data_dir(),
            video_url: DEFAULT_VIDEO_URL.to_string(),
            video_duration_secs: 596.5,
            drawing_window_secs: 5.0,
            comment_author: "User".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load from the platform config path.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("failed to read {}: {e}", path.display())))?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ClientError::Config(msg) => ClientError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ClientError::Config(e.to_string()))?;
        require_positive("drawing_window_secs", config.drawing_window_secs)?;
        require_positive("video_duration_secs", config.video_duration_secs)?;
        Ok(config)
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, base_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}

/// Finite and strictly positive (TOML accepts `nan` and `inf`)
fn require_positive(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ClientError::Config(format!("{key} must be a positive number, got {value}")))
    }
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trackerops")
        .join("config.toml")
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trackerops")
}
