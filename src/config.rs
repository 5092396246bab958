use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::utils::paths::config_path;

/// Settings read from an optional `traymenu.toml` in the menu directory.
/// A missing file means defaults; a malformed one is a startup error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_tooltip")]
    pub tooltip: String,

    /// Pause between focusing the target window and typing into it.
    #[serde(default = "default_send_key_delay_ms")]
    pub send_key_delay_ms: u64,

    /// Rebuild the menu automatically when a CSV file changes.
    #[serde(default = "default_watch")]
    pub watch: bool,
}

fn default_tooltip() -> String {
    "Enjoy your day!".to_string()
}

fn default_send_key_delay_ms() -> u64 {
    1000
}

fn default_watch() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tooltip: default_tooltip(),
            send_key_delay_ms: default_send_key_delay_ms(),
            watch: default_watch(),
        }
    }
}

impl Config {
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = config_path(base_dir);

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(config)
    }
}
