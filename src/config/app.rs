// src/config/app.rs
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::Deserialize;

#[cfg(feature = "logging")]
use tracing::{info, warn};

use crate::consts::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
use crate::core::Result;
use crate::enums::HashAlgorithm;
use crate::error::CoreError;
use crate::format::Template;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub defaults: Defaults,
}

/// Values applied to plan fields the host leaves unset
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub iterations: i64,
    pub salt_length: i64,
    pub hash_algorithm: HashAlgorithm,
    pub format: String,
}

impl Config {
    /// Reject defaults that could never produce a derivation
    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        if d.iterations < 1 {
            return Err(CoreError::Config(format!(
                "defaults.iterations must be ≥1, got {}",
                d.iterations
            )));
        }
        if d.salt_length < 1 {
            return Err(CoreError::Config(format!(
                "defaults.salt_length must be ≥1, got {}",
                d.salt_length
            )));
        }
        Template::parse(&d.format)
            .map_err(|e| CoreError::Config(format!("defaults.format: {e}")))?;
        Ok(())
    }
}

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load config at runtime — falls back to built-in defaults if missing
pub fn load() -> Result<&'static Config> {
    CONFIG.get_or_try_init(|| {
        let config_path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&config_path).exists() {
            #[cfg(feature = "logging")]
            info!(path = %config_path, "loading config");
            load_from_path(&config_path)
        } else {
            #[cfg(feature = "logging")]
            warn!(path = %config_path, "config not found — using built-in defaults");
            Ok(Config::default())
        }
    })
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<Config> {
    let conf: Config = toml::from_str(content)?;
    conf.validate()?;
    Ok(conf)
}
