use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::services::stop_conditions::{TargetIvs, TargetIvsError};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid target_ivs '{value}': {source}")]
    InvalidTargetIvs {
        value: String,
        #[source]
        source: TargetIvsError,
    },

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid debounce samples: {0}. Must be at least 1")]
    InvalidDebounceSamples(u32),

    #[error("Invalid debounce interval: {0}ms. Must be positive")]
    InvalidDebounceInterval(u64),

    #[error("Dumping is enabled but dump.folder is empty")]
    MissingDumpFolder,

    #[error("Invalid command_slack_ms: {0}. Must be positive")]
    InvalidCommandSlack(u64),

    #[error("Invalid program_timeout_ms: {0}. Must be positive")]
    InvalidProgramTimeout(u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .encounter-bot/config.yaml
    /// 3. .encounter-bot/local.yaml (optional overrides)
    /// 4. Environment variables (ENCOUNTER_BOT_* prefix, `__` separates sections)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".encounter-bot/config.yaml"))
            .merge(Yaml::file(".encounter-bot/local.yaml"))
            .merge(Env::prefixed("ENCOUNTER_BOT_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("ENCOUNTER_BOT_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        config
            .stop_conditions
            .target_ivs
            .parse::<TargetIvs>()
            .map_err(|source| ConfigError::InvalidTargetIvs {
                value: config.stop_conditions.target_ivs.clone(),
                source,
            })?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if config.debounce.samples == 0 {
            return Err(ConfigError::InvalidDebounceSamples(config.debounce.samples));
        }

        if config.debounce.interval_ms == 0 {
            return Err(ConfigError::InvalidDebounceInterval(
                config.debounce.interval_ms,
            ));
        }

        if config.dump.enabled && config.dump.folder.trim().is_empty() {
            return Err(ConfigError::MissingDumpFolder);
        }

        if config.device.command_slack_ms == 0 {
            return Err(ConfigError::InvalidCommandSlack(config.device.command_slack_ms));
        }

        if config.device.program_timeout_ms == 0 {
            return Err(ConfigError::InvalidProgramTimeout(
                config.device.program_timeout_ms,
            ));
        }

        Ok(())
    }
}
