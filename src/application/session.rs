//! Session - state and shared operations for one encounter run
//!
//! A [`Session`] is created when the bot starts a run and dropped when the run
//! ends. It owns the guarded device handle, the live routine selection, the
//! per-session counters and the collaborators every routine needs:
//! - stepping through tall grass until a wild battle starts
//! - fleeing battles
//! - evaluating, counting and dumping encounters
//! - interpreting scripted trigger sequences

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::errors::{SessionError, SessionResult};
use crate::domain::models::{
    BotRoutine, Button, Config, EncounterEntity, EncounterKind, OffsetsConfig, ResetSpeed,
    RoutineOutcome, ScriptStep, SearchResult, SweepAxis,
};
use crate::domain::ports::{EncounterDumper, StopCriteriaEvaluator};
use crate::services::{DebouncedReader, RecoveryManager, Remote, SessionCounters};

/// Stick deflection used for line sweeps.
pub const SWEEP_MAGNITUDE: i16 = 30_000;
/// Time spent walking in one direction per sweep.
pub const SWEEP_DURATION: Duration = Duration::from_millis(2_400);
/// Neutral stick time between sweeps.
pub const SWEEP_RELEASE: Duration = Duration::from_millis(100);
const FLEE_PRESS_DELAY: Duration = Duration::from_millis(400);
const CAPTURE_HOLD: Duration = Duration::from_millis(2_000);
const CAPTURE_SETTLE: Duration = Duration::from_millis(1_000);
const PROGRESS_EVERY: u32 = 10;

#[derive(Debug, Clone, Copy)]
struct CaptureSettings {
    enabled: bool,
    extra_wait: Duration,
}

/// State and shared behaviour of one running session.
pub struct Session {
    remote: Remote,
    routine: watch::Receiver<BotRoutine>,
    attempts: u32,
    encounter_count: u64,
    menu: DebouncedReader,
    recovery: RecoveryManager,
    counters: Arc<SessionCounters>,
    evaluator: Arc<dyn StopCriteriaEvaluator>,
    dumper: Option<Arc<dyn EncounterDumper>>,
    capture: CaptureSettings,
    offsets: OffsetsConfig,
}

impl Session {
    pub fn new(
        remote: Remote,
        routine: watch::Receiver<BotRoutine>,
        evaluator: Arc<dyn StopCriteriaEvaluator>,
        counters: Arc<SessionCounters>,
        config: &Config,
    ) -> Self {
        Self {
            remote,
            routine,
            attempts: 0,
            encounter_count: 0,
            menu: DebouncedReader::battle_menu(&config.offsets, &config.debounce),
            recovery: RecoveryManager::new(),
            counters,
            evaluator,
            dumper: None,
            capture: CaptureSettings {
                enabled: config.stop_conditions.capture_video_clip,
                extra_wait: Duration::from_millis(
                    config.stop_conditions.extra_time_wait_capture_video_ms,
                ),
            },
            offsets: config.offsets.clone(),
        }
    }

    /// Dump every evaluated encounter through `dumper`.
    #[must_use]
    pub fn with_dumper(mut self, dumper: Option<Arc<dyn EncounterDumper>>) -> Self {
        self.dumper = dumper;
        self
    }

    pub const fn remote(&self) -> &Remote {
        &self.remote
    }

    pub const fn offsets(&self) -> &OffsetsConfig {
        &self.offsets
    }

    /// Search steps of the current (or last) search cycle.
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Encounters handled during this session.
    pub const fn encounter_count(&self) -> u64 {
        self.encounter_count
    }

    pub const fn resets(&self) -> u64 {
        self.recovery.resets()
    }

    /// Whether the encounter routine is still selected.
    pub fn is_active(&self) -> bool {
        *self.routine.borrow() == BotRoutine::Encounter
    }

    /// Loop condition shared by every routine.
    pub fn should_continue(&self) -> bool {
        !self.remote.is_cancelled() && self.is_active()
    }

    /// Walk back and forth along `axis` until a battle starts.
    ///
    /// Returns [`SearchResult::Aborted`] when the session is cancelled or the
    /// routine is deselected before any battle was observed.
    pub async fn step_until_encounter(&mut self, axis: SweepAxis) -> SessionResult<SearchResult> {
        info!(?axis, "walking around until an encounter");
        self.attempts = 0;
        match self.sweep_until_battle(axis).await {
            Err(SessionError::Cancelled) => Ok(SearchResult::Aborted),
            other => other,
        }
    }

    async fn sweep_until_battle(&mut self, axis: SweepAxis) -> SessionResult<SearchResult> {
        while self.should_continue() {
            if self.remote.is_in_battle().await? {
                return Ok(SearchResult::FoundAfter(self.attempts));
            }

            let (x, y) = axis.vector(-SWEEP_MAGNITUDE);
            self.remote.set_stick(x, y, SWEEP_DURATION).await?;
            self.remote.set_stick(0, 0, SWEEP_RELEASE).await?;

            // A battle after the first sweep skips the return sweep but still
            // counts the iteration.
            if self.remote.is_in_battle().await? {
                self.attempts += 1;
                return Ok(SearchResult::FoundAfter(self.attempts));
            }

            let (x, y) = axis.vector(SWEEP_MAGNITUDE);
            self.remote.set_stick(x, y, SWEEP_DURATION).await?;
            self.remote.set_stick(0, 0, SWEEP_RELEASE).await?;

            self.attempts += 1;
            if self.attempts % PROGRESS_EVERY == 0 {
                info!(attempts = self.attempts, "still no encounter");
            }
        }
        Ok(SearchResult::Aborted)
    }

    /// One pass of the run-away sequence. Never inspects the battle.
    pub async fn flee(&self) -> SessionResult<()> {
        for button in [Button::DUp, Button::A, Button::B, Button::B] {
            self.remote.click(button, FLEE_PRESS_DELAY).await?;
        }
        Ok(())
    }

    /// Repeat [`Self::flee`] until the console reports no battle.
    pub async fn flee_until_clear(&self) -> SessionResult<()> {
        while self.remote.is_in_battle().await? {
            self.flee().await?;
        }
        Ok(())
    }

    /// Debounce-confirm the battle menu; an unconfirmed menu is logged only.
    pub async fn confirm_battle_menu(&self) -> SessionResult<bool> {
        let confirmed = self.menu.confirm(&self.remote).await?;
        if !confirmed {
            debug!(samples = self.menu.samples(), "battle menu not confirmed, proceeding");
        }
        Ok(confirmed)
    }

    /// Count, dump and evaluate a valid encounter.
    ///
    /// Returns [`RoutineOutcome::Matched`] iff the evaluator accepts the
    /// entity. The post-match capture is best effort and cannot change that.
    pub async fn handle_encounter(
        &mut self,
        entity: &EncounterEntity,
        kind: EncounterKind,
    ) -> SessionResult<RoutineOutcome> {
        self.encounter_count += 1;
        let total = self.counters.record(kind);
        info!(
            encounter = self.encounter_count,
            total,
            ?kind,
            %entity,
            "encounter"
        );

        if let Some(dumper) = &self.dumper {
            if let Err(e) = dumper.dump(kind, entity).await {
                warn!(error = %e, "failed to dump encounter");
            }
        }

        let outcome = RoutineOutcome::from_matched(self.evaluator.is_match(entity));
        if outcome == RoutineOutcome::Matched {
            info!(
                criteria = %self.evaluator.describe(),
                "result found, stopping routine execution; restart the bot to search again"
            );
            if self.capture.enabled {
                if let Err(e) = self.capture_clip().await {
                    warn!(error = %e, "capture after match failed");
                }
            }
        }
        Ok(outcome)
    }

    async fn capture_clip(&self) -> SessionResult<()> {
        self.remote.pause(self.capture.extra_wait).await?;
        self.remote
            .press_and_hold(Button::Capture, CAPTURE_HOLD, CAPTURE_SETTLE)
            .await
    }

    /// Close and reopen the game to reroll a fixed encounter.
    pub async fn reset_encounter(&mut self, target: &str, speed: ResetSpeed) -> SessionResult<()> {
        self.recovery.reroll(&self.remote, target, speed).await
    }

    /// Execute a scripted input sequence.
    pub async fn run_script(&self, steps: &[ScriptStep]) -> SessionResult<()> {
        for step in steps {
            match *step {
                ScriptStep::Click { button, delay } => self.remote.click(button, delay).await?,
                ScriptStep::Stick { x, y, duration } => {
                    self.remote.set_stick(x, y, duration).await?;
                }
                ScriptStep::ResetStick => self.remote.reset_stick().await?,
                ScriptStep::Wait(duration) => self.remote.pause(duration).await?,
                ScriptStep::ClickUntilInBattle { button, delay } => {
                    while !self.remote.is_in_battle().await? {
                        self.remote.click(button, delay).await?;
                    }
                }
                ScriptStep::ConfirmBattleMenu => {
                    self.confirm_battle_menu().await?;
                }
                ScriptStep::FleeUntilClear => self.flee_until_clear().await?,
                ScriptStep::Announce(message) => info!("{message}"),
            }
        }
        Ok(())
    }
}
