//! Encounter Bot CLI entry point.

use clap::Parser;

use encounter_bot::cli::commands::{config, modes, simulate};
use encounter_bot::cli::{handle_error, Cli, Commands};
use encounter_bot::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = async {
        let loaded = config::load_config(cli.config.as_deref())?;
        let _logger = LoggerImpl::init(&LogConfig::from(&loaded.logging))?;

        match &cli.command {
            Commands::Simulate(args) => simulate::execute(args, loaded, cli.json).await,
            Commands::Config(args) => config::execute(args, &loaded, cli.json),
            Commands::Modes(args) => modes::execute(args, cli.json),
        }
    }
    .await;

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
