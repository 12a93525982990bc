//! Implementation of the `encounter-bot modes` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::application::dispatch;
use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::{EncounterMode, FixedEncounterProfile, ResetSpeed};

#[derive(Args, Debug)]
pub struct ModesArgs {}

#[derive(Debug, Serialize)]
pub struct ModeEntry {
    pub mode: &'static str,
    pub aliases: Vec<&'static str>,
    pub routine: &'static str,
    pub reset: Option<&'static str>,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ModesOutput {
    pub modes: Vec<ModeEntry>,
}

impl ModesOutput {
    pub fn collect() -> Self {
        let modes = EncounterMode::ALL
            .iter()
            .map(|mode| ModeEntry {
                mode: mode.as_str(),
                aliases: mode.aliases().to_vec(),
                routine: dispatch(*mode).name(),
                reset: FixedEncounterProfile::for_mode(*mode).map(|profile| match profile.reset {
                    ResetSpeed::Fast => "fast",
                    ResetSpeed::Slow => "slow",
                }),
                description: mode.description(),
            })
            .collect();
        Self { modes }
    }
}

impl CommandOutput for ModesOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["mode", "aliases", "routine", "reset", "description"]);
        for entry in &self.modes {
            table.add_row(vec![
                entry.mode.to_string(),
                entry.aliases.join(", "),
                entry.routine.to_string(),
                entry.reset.unwrap_or("-").to_string(),
                entry.description.to_string(),
            ]);
        }
        format!(
            "{} encounter modes (unknown values fall back to vertical_line):\n{table}",
            self.modes.len()
        )
    }
}

pub fn execute(_args: &ModesArgs, json_mode: bool) -> Result<()> {
    output(&ModesOutput::collect(), json_mode);
    Ok(())
}
