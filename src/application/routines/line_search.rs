//! Wild encounters found by walking back and forth along one axis.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::EncounterRoutine;
use crate::application::session::Session;
use crate::domain::errors::SessionResult;
use crate::domain::models::{EncounterEntity, EncounterKind, RoutineOutcome, SearchResult, SweepAxis};

const READ_TIMEOUT: Duration = Duration::from_millis(2_000);
const READ_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy)]
pub struct LineSearchRoutine {
    axis: SweepAxis,
}

impl LineSearchRoutine {
    pub const fn new(axis: SweepAxis) -> Self {
        Self { axis }
    }
}

#[async_trait]
impl EncounterRoutine for LineSearchRoutine {
    fn name(&self) -> &'static str {
        match self.axis {
            SweepAxis::Vertical => "vertical line search",
            SweepAxis::Horizontal => "horizontal line search",
        }
    }

    async fn run(&self, session: &mut Session) -> SessionResult<Option<EncounterEntity>> {
        while session.should_continue() {
            let attempts = match session.step_until_encounter(self.axis).await? {
                SearchResult::Aborted => continue,
                SearchResult::FoundAfter(attempts) => attempts,
            };
            info!(attempts, "encounter found, checking details");

            session.remote().reset_stick().await?;

            let offset = session.offsets().wild;
            let Some(entity) = session
                .remote()
                .read_entity(offset, READ_TIMEOUT, READ_INTERVAL)
                .await?
            else {
                warn!("invalid encounter data, fleeing and restarting the search");
                session.flee_until_clear().await?;
                continue;
            };

            session.remote().reset_stick().await?;
            session.confirm_battle_menu().await?;

            if session.handle_encounter(&entity, EncounterKind::Wild).await? == RoutineOutcome::Matched {
                return Ok(Some(entity));
            }

            info!("running away");
            session.flee_until_clear().await?;
        }
        Ok(None)
    }
}
