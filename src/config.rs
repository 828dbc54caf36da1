use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::analyzer::AnalyzerConfig;
use crate::error::{Result, SimError};
use crate::scoring::{ModifierConfig, WeightTable};
use crate::stages::{FilterConfig, SourcingConfig, VisibilityConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: 10_000,
        }
    }
}

/// Process-wide settings. Loaded once at start-up and handed to the pipeline
/// and analyzer constructors; nothing reads it afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub weights: WeightTable,
    pub modifiers: ModifierConfig,
    pub sourcing: SourcingConfig,
    pub filtering: FilterConfig,
    pub visibility: VisibilityConfig,
    pub analyzer: AnalyzerConfig,
    pub classifier: ClassifierConfig,
}

impl SimConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| SimError::Config(format!("failed to read config: {}", err)))?;
                Self::from_toml(&contents)?
            }
            _ => SimConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|err| SimError::Config(format!("failed to parse config: {}", err)))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|err| SimError::Config(format!("failed to create config dir: {}", err)))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| SimError::Config(format!("failed to serialize config: {}", err)))?;
        std::fs::write(path, payload)
            .map_err(|err| SimError::Config(format!("failed to write config: {}", err)))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = env::var("CLASSIFIER_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.classifier.endpoint = Some(endpoint);
            }
        }
        if let Ok(timeout) = env::var("CLASSIFIER_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.classifier.timeout_ms = value;
            }
        }
        if let Ok(threshold) = env::var("FEED_SIM_GLOBAL_FOLLOWERS") {
            if let Ok(value) = threshold.parse::<u64>() {
                self.sourcing.global_follower_threshold = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("FEED_SIM_CONFIG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/feed-sim.toml")))
}
