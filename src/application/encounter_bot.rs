//! EncounterBot - session entry point for the external scheduler
//!
//! [`EncounterBot::run_session`] identifies the trainer, dispatches the
//! configured mode to its routine, drives it until a match, cancellation or
//! deselection, and always runs the device cleanup exactly once on the way out.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::routines::dispatch;
use crate::application::session::Session;
use crate::domain::errors::{SessionError, SessionResult};
use crate::domain::models::{BotRoutine, Config, EncounterEntity, SessionOutcome};
use crate::domain::ports::{EncounterDumper, StopCriteriaEvaluator, SwitchDevice};
use crate::infrastructure::dump::FileDumper;
use crate::services::{IvStopConditions, Remote, SessionCounters};

/// Controller owning one device for the lifetime of its sessions.
pub struct EncounterBot {
    device: Arc<dyn SwitchDevice>,
    config: Config,
    evaluator: Arc<dyn StopCriteriaEvaluator>,
    dumper: Option<Arc<dyn EncounterDumper>>,
    counters: Arc<SessionCounters>,
    routine: watch::Sender<BotRoutine>,
    /// Held for a whole session, cleanup included.
    device_lock: Mutex<()>,
}

impl EncounterBot {
    /// Build a bot with the stop conditions and dumper described by `config`.
    pub fn new(device: Arc<dyn SwitchDevice>, config: Config) -> Result<Self, SessionError> {
        let evaluator = IvStopConditions::from_config(&config.stop_conditions)
            .map_err(|e| SessionError::InvalidStopConditions(e.to_string()))?;
        let dumper = config
            .dump
            .is_active()
            .then(|| Arc::new(FileDumper::new(&config.dump.folder)) as Arc<dyn EncounterDumper>);
        let (routine, _) = watch::channel(BotRoutine::Encounter);

        Ok(Self {
            device,
            config,
            evaluator: Arc::new(evaluator),
            dumper,
            counters: Arc::new(SessionCounters::new()),
            routine,
            device_lock: Mutex::new(()),
        })
    }

    /// Replace the stop-criteria evaluator.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Arc<dyn StopCriteriaEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Replace (or disable, with `None`) the encounter dumper.
    #[must_use]
    pub fn with_dumper(mut self, dumper: Option<Arc<dyn EncounterDumper>>) -> Self {
        self.dumper = dumper;
        self
    }

    /// Share counters with other bots of the same process.
    #[must_use]
    pub fn with_counters(mut self, counters: Arc<SessionCounters>) -> Self {
        self.counters = counters;
        self
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn counters(&self) -> Arc<SessionCounters> {
        Arc::clone(&self.counters)
    }

    /// Select the routine the bot should be running.
    ///
    /// Selecting [`BotRoutine::Idle`] stops a running session at its next loop
    /// check with [`SessionOutcome::Deactivated`].
    pub fn set_routine(&self, routine: BotRoutine) {
        self.routine.send_replace(routine);
    }

    pub fn routine(&self) -> BotRoutine {
        *self.routine.borrow()
    }

    /// Run one session until a match, cancellation or deselection.
    ///
    /// Device failures are returned as errors, after cleanup has run. Only one
    /// session drives the device at a time; an overlapping call fails with
    /// [`SessionError::Busy`] without touching the device.
    pub async fn run_session(&self, token: CancellationToken) -> Result<SessionOutcome> {
        let Ok(_device) = self.device_lock.try_lock() else {
            warn!("rejecting session, the device is already in use");
            return Err(SessionError::Busy.into());
        };

        let session_id = Uuid::new_v4();
        let mode = self.config.encounter.mode;
        let span = info_span!("session", %session_id, %mode);

        async move {
            let remote = Remote::new(
                Arc::clone(&self.device),
                token.clone(),
                &self.config.device,
                self.config.timing.clone(),
            );
            let mut session = Session::new(
                remote.clone(),
                self.routine.subscribe(),
                Arc::clone(&self.evaluator),
                Arc::clone(&self.counters),
                &self.config,
            )
            .with_dumper(self.dumper.clone());

            let result = self.drive(&mut session).await;
            remote.cleanup().await;

            let encounters = session.encounter_count();
            let outcome = match result {
                Ok(Some(entity)) => SessionOutcome::Matched { entity, encounters },
                Ok(None) | Err(SessionError::Cancelled) if token.is_cancelled() => {
                    SessionOutcome::Cancelled { encounters }
                }
                Ok(None) | Err(SessionError::Cancelled) => SessionOutcome::Deactivated { encounters },
                Err(e) => {
                    warn!(error = %e, encounters, "session failed");
                    return Err(anyhow::Error::new(e).context("encounter session failed"));
                }
            };

            info!(?outcome, resets = session.resets(), "session finished");
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    async fn drive(&self, session: &mut Session) -> SessionResult<Option<EncounterEntity>> {
        let trainer = session.remote().identify_trainer().await?;
        info!(
            trainer = %trainer.name,
            tid = trainer.trainer_id,
            sid = trainer.secret_id,
            game = %trainer.game,
            "starting encounter bot"
        );

        session.remote().reset_stick().await?;

        let routine = dispatch(self.config.encounter.mode);
        info!(routine = routine.name(), "routine selected");
        routine.run(session).await
    }
}
