use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub mpd: MpdConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MpdConfig {
    /// Address of the MPD server.
    #[serde(default = "default_address")]
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Step for the left/right seek keys, in seconds.
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: u32,
}

impl Default for MpdConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            seek_step_secs: default_seek_step(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:6600".to_string()
}

fn default_seek_step() -> u32 {
    5
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mpd.address, "127.0.0.1:6600");
        assert_eq!(config.ui.seek_step_secs, 5);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Config = toml::from_str("[mpd]\naddress = \"music-box:6600\"\n").unwrap();
        assert_eq!(config.mpd.address, "music-box:6600");
        assert_eq!(config.ui.seek_step_secs, 5);
    }
}
