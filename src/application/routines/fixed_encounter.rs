//! Fixed (seeded) encounters rerolled by restarting the game.
//!
//! Every fixed encounter runs the same skeleton: trigger, read, evaluate and
//! close+reopen on a miss. What differs per encounter is described by its
//! [`FixedEncounterProfile`].

use async_trait::async_trait;
use tracing::{info, warn};

use super::EncounterRoutine;
use crate::application::session::Session;
use crate::domain::errors::SessionResult;
use crate::domain::models::{
    EncounterEntity, EncounterKind, FixedEncounterProfile, ReadStrategy, RoutineOutcome,
};

pub struct FixedEncounterRoutine {
    profile: FixedEncounterProfile,
}

impl FixedEncounterRoutine {
    pub const fn new(profile: FixedEncounterProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> &FixedEncounterProfile {
        &self.profile
    }

    async fn read_entity(&self, session: &Session) -> SessionResult<Option<EncounterEntity>> {
        let offset = self.profile.slot.offset(session.offsets());
        session
            .remote()
            .read_entity(offset, self.profile.read_timeout, self.profile.read_interval)
            .await
    }

    /// Read and evaluate the encounter; `Some` only for a match.
    async fn check(&self, session: &mut Session) -> SessionResult<Option<EncounterEntity>> {
        match self.profile.read {
            ReadStrategy::Once => match self.read_entity(session).await? {
                Some(entity) => self.evaluate(session, entity).await,
                None => {
                    warn!(target_name = self.profile.name, "invalid encounter data");
                    Ok(None)
                }
            },
            ReadStrategy::Window { total, poll_every } => {
                info!("waiting to see if an encounter shows up");
                let mut remaining = total;
                while !remaining.is_zero() && !poll_every.is_zero() {
                    session.remote().pause(poll_every).await?;
                    remaining = remaining.saturating_sub(poll_every);
                    if let Some(entity) = self.read_entity(session).await? {
                        return self.evaluate(session, entity).await;
                    }
                    if session.remote().is_in_battle().await? {
                        break;
                    }
                }
                Ok(None)
            }
        }
    }

    async fn evaluate(
        &self,
        session: &mut Session,
        entity: EncounterEntity,
    ) -> SessionResult<Option<EncounterEntity>> {
        session.run_script(&self.profile.settle).await?;
        let outcome = session.handle_encounter(&entity, EncounterKind::Legend).await?;
        Ok((outcome == RoutineOutcome::Matched).then_some(entity))
    }
}

#[async_trait]
impl EncounterRoutine for FixedEncounterRoutine {
    fn name(&self) -> &'static str {
        self.profile.name
    }

    async fn run(&self, session: &mut Session) -> SessionResult<Option<EncounterEntity>> {
        while session.should_continue() {
            session.run_script(&self.profile.trigger).await?;

            if let Some(entity) = self.check(session).await? {
                return Ok(Some(entity));
            }

            session
                .reset_encounter(self.profile.name, self.profile.reset)
                .await?;
        }
        Ok(None)
    }
}
