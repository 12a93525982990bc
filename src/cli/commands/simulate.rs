//! Implementation of the `encounter-bot simulate` command.
//!
//! Rehearses a mode and stop-condition combination against the simulated
//! console. Ctrl-C (or `--limit-secs`) cancels the session cooperatively.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::EncounterBot;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, EncounterMode, SessionOutcome};
use crate::domain::ports::SwitchDevice;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::device::SimulatedDevice;
use crate::services::CountsSnapshot;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Encounter mode (overrides encounter.mode)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Target IVs such as 31/31/31/31/31/31; `_` accepts any value
    #[arg(short, long)]
    pub target_ivs: Option<String>,

    /// Seed for generated encounters (overrides simulation.seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip simulated device latency
    #[arg(long)]
    pub fast: bool,

    /// Cancel the session after this many seconds
    #[arg(long)]
    pub limit_secs: Option<u64>,
}

impl SimulateArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(mode) = &self.mode {
            config.encounter.mode = mode.parse::<EncounterMode>().unwrap_or_default();
        }
        if let Some(targets) = &self.target_ivs {
            config.stop_conditions.target_ivs.clone_from(targets);
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        ConfigLoader::validate(config).context("Invalid simulation settings")?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SimulateOutput {
    pub mode: EncounterMode,
    #[serde(flatten)]
    pub outcome: SessionOutcome,
    pub totals: CountsSnapshot,
    pub elapsed_ms: u128,
}

impl CommandOutput for SimulateOutput {
    fn to_human(&self) -> String {
        let headline = match &self.outcome {
            SessionOutcome::Matched { entity, encounters } => format!(
                "{} Match after {encounters} encounter(s): {entity}",
                style("✓").green().bold()
            ),
            SessionOutcome::Cancelled { encounters } => format!(
                "{} Cancelled after {encounters} encounter(s)",
                style("■").yellow()
            ),
            SessionOutcome::Deactivated { encounters } => format!(
                "{} Routine deselected after {encounters} encounter(s)",
                style("■").dim()
            ),
        };
        format!(
            "{headline}\n  mode:       {}\n  encounters: {} wild, {} legendary\n  elapsed:    {:.1}s",
            self.mode,
            self.totals.encounters,
            self.totals.legends,
            Duration::from_millis(u64::try_from(self.elapsed_ms).unwrap_or(u64::MAX)).as_secs_f64(),
        )
    }
}

pub async fn execute(args: &SimulateArgs, mut config: Config, json_mode: bool) -> Result<()> {
    args.apply(&mut config)?;

    let device: Arc<dyn SwitchDevice> =
        Arc::new(SimulatedDevice::new(config.simulation.clone()).with_delays(!args.fast));
    let mode = config.encounter.mode;
    let bot = EncounterBot::new(device, config).context("Failed to build encounter bot")?;

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling session");
            ctrl_c.cancel();
        }
    });
    if let Some(limit) = args.limit_secs {
        let deadline = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(limit)).await;
            info!(limit_secs = limit, "time limit reached, cancelling session");
            deadline.cancel();
        });
    }

    let started = Instant::now();
    let outcome = bot.run_session(token).await?;

    output(
        &SimulateOutput {
            mode,
            outcome,
            totals: bot.counters().snapshot(),
            elapsed_ms: started.elapsed().as_millis(),
        },
        json_mode,
    );
    Ok(())
}
