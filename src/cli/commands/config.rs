//! Implementation of the `encounter-bot config` commands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::IvStopConditions;
use crate::domain::ports::StopCriteriaEvaluator;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the merged configuration
    Show,

    /// Check the configuration and summarize the stop conditions
    Validate,
}

#[derive(Debug, Serialize)]
pub struct ConfigShowOutput {
    pub config: Config,
}

impl CommandOutput for ConfigShowOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigValidateOutput {
    pub valid: bool,
    pub mode: String,
    pub stop_conditions: String,
    pub dumping: bool,
}

impl CommandOutput for ConfigValidateOutput {
    fn to_human(&self) -> String {
        format!(
            "{} Configuration is valid\n  mode:            {}\n  stop conditions: {}\n  dumping:         {}",
            style("✓").green().bold(),
            self.mode,
            self.stop_conditions,
            if self.dumping { "enabled" } else { "disabled" },
        )
    }
}

/// Load from `path` when given, otherwise from the project config hierarchy.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

pub fn validate_summary(config: &Config) -> Result<ConfigValidateOutput> {
    ConfigLoader::validate(config).context("Configuration is invalid")?;
    let conditions = IvStopConditions::from_config(&config.stop_conditions)
        .context("Invalid stop conditions")?;
    Ok(ConfigValidateOutput {
        valid: true,
        mode: config.encounter.mode.to_string(),
        stop_conditions: conditions.describe(),
        dumping: config.dump.is_active(),
    })
}

pub fn execute(args: &ConfigArgs, config: &Config, json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommands::Show => output(
            &ConfigShowOutput {
                config: config.clone(),
            },
            json_mode,
        ),
        ConfigCommands::Validate => output(&validate_summary(config)?, json_mode),
    }
    Ok(())
}
