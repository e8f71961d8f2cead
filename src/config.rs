//! Configuration management for citeview using the prefer crate.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default outputs root, relative to the working directory. The pipeline
/// writes one folder per document id here.
pub const DEFAULT_OUTPUTS_DIR: &str = "./../outputs";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root directory holding one output folder per document.
    pub outputs_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            outputs_dir: PathBuf::from(DEFAULT_OUTPUTS_DIR),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Outputs root directory. Tilde paths are expanded.
    #[serde(default)]
    pub outputs: Option<String>,
}

impl Config {
    /// Load configuration using the prefer crate.
    /// Automatically discovers citeview config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("citeview").await {
            Ok(pref_config) => {
                let outputs: Option<String> = pref_config.get("outputs").ok();
                Config { outputs }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref outputs) = self.outputs {
            let path = shellexpand::tilde(outputs);
            settings.outputs_dir = PathBuf::from(path.as_ref());
        }
    }
}

/// Load settings from configuration.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
