//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::commands::config::ConfigArgs;
use crate::cli::commands::modes::ModesArgs;
use crate::cli::commands::simulate::SimulateArgs;

#[derive(Parser, Debug)]
#[command(name = "encounter-bot")]
#[command(about = "Encounter Bot - automated encounter acquisition for game consoles", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .encounter-bot/config.yaml + local.yaml)
    #[arg(short, long, global = true, env = "ENCOUNTER_BOT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full session against the simulated console
    Simulate(SimulateArgs),

    /// Inspect or validate configuration
    Config(ConfigArgs),

    /// List encounter modes and the routine each one runs
    Modes(ModesArgs),
}
