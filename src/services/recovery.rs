//! Full program restarts used to reroll fixed encounters.

use tracing::info;

use crate::domain::errors::SessionResult;
use crate::domain::models::ResetSpeed;
use crate::services::remote::Remote;

/// Closes and reopens the game so a seeded encounter rolls again.
#[derive(Debug, Default)]
pub struct RecoveryManager {
    resets: u64,
}

impl RecoveryManager {
    pub const fn new() -> Self {
        Self { resets: 0 }
    }

    /// Number of completed close+reopen cycles.
    pub const fn resets(&self) -> u64 {
        self.resets
    }

    /// Close the game, then reopen it with the requested load profile.
    pub async fn reroll(&mut self, remote: &Remote, target: &str, speed: ResetSpeed) -> SessionResult<()> {
        info!(target_name = target, ?speed, "resetting encounter by restarting the game");
        remote.close_program().await?;
        match speed {
            ResetSpeed::Fast => remote.start_program().await?,
            ResetSpeed::Slow => remote.start_program_slow().await?,
        }
        self.resets += 1;
        Ok(())
    }
}
