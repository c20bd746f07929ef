//! Controller configuration schema and loader
//!
//! Configuration is stored as YAML in the user config folder.
//! Default location: ~/.config/ddjsr/controller.yaml

use ddjsr_core::DeckConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Port name substring to match (case-insensitive)
    pub port_match: String,
    /// Behavior shared by all four decks
    pub deck: DeckConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            port_match: "DDJ-SR".to_string(),
            deck: DeckConfig::default(),
        }
    }
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ddjsr")
        .join("controller.yaml")
}

/// Load controller configuration from a YAML file
///
/// A missing or invalid file yields the defaults.
pub fn load_config(path: &Path) -> ControllerConfig {
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return ControllerConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<ControllerConfig>(&contents) {
            Ok(config) => {
                log::info!("load_config: Loaded config (port_match: '{}')", config.port_match);
                config
            }
            Err(e) => {
                log::warn!("load_config: Failed to parse config: {}", e);
                ControllerConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: Failed to read config file: {}", e);
            ControllerConfig::default()
        }
    }
}

/// Save controller configuration to a YAML file
pub fn save_config(config: &ControllerConfig, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    log::info!("save_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize controller config to YAML")?;

    std::fs::write(path, yaml).with_context(|| format!("Failed to write controller config file: {:?}", path))?;

    log::info!("save_config: Config saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.yaml"));
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("controller.yaml");

        let mut config = ControllerConfig::default();
        config.port_match = "PIONEER DDJ-SR".to_string();
        config.deck.jog.bend_sensitivity = 0.25;
        save_config(&config, &path).unwrap();

        assert_eq!(load_config(&path), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controller.yaml");
        std::fs::write(&path, "deck:\n  jog:\n    rpm: 45.0\n").unwrap();

        let config = load_config(&path);
        assert_eq!(config.port_match, "DDJ-SR");
        assert_eq!(config.deck.jog.rpm, 45.0);
        assert_eq!(config.deck.roll_sizes, DeckConfig::default().roll_sizes);
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controller.yaml");
        std::fs::write(&path, "port_match: [unclosed").unwrap();
        assert_eq!(load_config(&path), ControllerConfig::default());
    }
}
