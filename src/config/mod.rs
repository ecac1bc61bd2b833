use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::{
    errors::ConfigError,
    utils::persistence::{load_json, save_json_atomic},
};

const DEFAULT_DIR_NAME: &str = ".finmate";
const HOME_ENV: &str = "FINMATE_HOME";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "engine.json";

/// Tunables for the realtime side of the engine and the progression ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub suggestion_interval_secs: u64,
    pub suggestion_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion_seed: Option<u64>,
    pub send_timeout_ms: u64,
    pub heartbeat_interval_secs: u64,
    pub level_up_bonus_coins: u64,
    pub currency: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suggestion_interval_secs: 600,
            suggestion_probability: 0.2,
            suggestion_seed: None,
            send_timeout_ms: 5_000,
            heartbeat_interval_secs: 30,
            level_up_bonus_coins: 10,
            currency: "AZN".into(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.suggestion_probability) {
            return Err(invalid(
                "suggestion_probability",
                format!("must be within [0, 1], got {}", self.suggestion_probability),
            ));
        }
        if self.suggestion_interval_secs == 0 {
            return Err(invalid("suggestion_interval_secs", "must be positive"));
        }
        if self.send_timeout_ms == 0 {
            return Err(invalid("send_timeout_ms", "must be positive"));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(invalid("heartbeat_interval_secs", "must be positive"));
        }
        if self.currency.trim().is_empty() {
            return Err(invalid("currency", "must not be empty"));
        }
        Ok(())
    }

    pub fn suggestion_interval(&self) -> Duration {
        Duration::from_secs(self.suggestion_interval_secs)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.into(),
        message: message.into(),
    }
}

/// Returns the engine data directory, defaulting to `~/.finmate`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Handles persistence for [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: base.join(CONFIG_DIR).join(CONFIG_FILE),
        }
    }

    /// Loads the stored config, falling back to defaults when none was saved yet.
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        let config = if self.path.exists() {
            load_json(&self.path)?
        } else {
            EngineConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        save_json_atomic(config, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_returns_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        assert_eq!(manager.load().unwrap(), EngineConfig::default());
    }

    #[test]
    fn save_and_reload_round_trip() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        let config = EngineConfig {
            suggestion_probability: 0.5,
            suggestion_seed: Some(7),
            currency: "EUR".into(),
            ..EngineConfig::default()
        };
        manager.save(&config).unwrap();
        assert!(manager.path().ends_with("config/engine.json"));
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn validate_rejects_out_of_range_probability() {
        let config = EngineConfig {
            suggestion_probability: 1.5,
            ..EngineConfig::default()
        };
        let err = config.validate().expect_err("probability above 1 must fail");
        assert!(
            matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "suggestion_probability"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "send_timeout_ms": 250 }"#).unwrap();
        assert_eq!(config.send_timeout(), Duration::from_millis(250));
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(30));
    }
}
