//! In-memory console model implementing [`SwitchDevice`].
//!
//! The model only covers what the routines observe:
//! - tilting the stick counts a sweep; every `encounter_every_sweeps` sweeps
//!   start a wild battle
//! - pressing A outside a battle starts a fixed battle after
//!   `trigger_presses` presses
//! - D-pad up followed by A inside a battle runs away
//! - restarting the game rolls a new encounter into memory
//!
//! Scripted overrides (queued battle states, reads and menu samples) take
//! precedence over the model, which lets tests pin down exact sequences.
//! Every call is recorded in a journal.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::errors::{DeviceError, DeviceResult};
use crate::domain::models::{
    Button, EncounterEntity, SimulationConfig, Stick, TimingConfig, TrainerInfo, STAT_COUNT,
};
use crate::domain::ports::SwitchDevice;

const START_DELAY: Duration = Duration::from_millis(1_500);
const SLOW_START_DELAY: Duration = Duration::from_millis(4_000);
const CLOSE_DELAY: Duration = Duration::from_millis(500);

/// Journal entry for one device call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Click(Button),
    PressAndHold(Button),
    SetStick { x: i16, y: i16 },
    ReadUntilPresent(u32),
    ReadUntilChanged(u32),
    IsInBattle,
    CloseProgram,
    StartProgram,
    StartProgramSlow,
    IdentifyTrainer,
    DetachController,
}

struct SimState {
    in_battle: bool,
    sweeps: u32,
    a_presses: u32,
    flee_armed: bool,
    loaded: Option<EncounterEntity>,
    rng: StdRng,
    scripted_entities: VecDeque<EncounterEntity>,
    battle_overrides: VecDeque<bool>,
    read_overrides: VecDeque<Option<EncounterEntity>>,
    menu_overrides: VecDeque<bool>,
    fail_press_and_hold: bool,
    disconnect_after: Option<usize>,
    calls: Vec<DeviceCall>,
}

impl SimState {
    fn roll_entity(&mut self, config: &SimulationConfig) -> EncounterEntity {
        if let Some(entity) = self.scripted_entities.pop_front() {
            return entity;
        }
        let mut ivs = [0u8; STAT_COUNT];
        for iv in &mut ivs {
            *iv = self.rng.gen_range(0..=31);
        }
        let shiny = self.rng.gen_range(0..config.shiny_odds.max(1)) == 0;
        EncounterEntity::new(config.species, ivs, shiny)
    }

    fn start_battle(&mut self, config: &SimulationConfig) {
        self.in_battle = true;
        self.sweeps = 0;
        self.a_presses = 0;
        self.flee_armed = false;
        if self.loaded.is_none() {
            self.loaded = Some(self.roll_entity(config));
        }
    }

    fn end_battle(&mut self) {
        self.in_battle = false;
        self.flee_armed = false;
        self.loaded = None;
    }
}

/// Simulated console.
pub struct SimulatedDevice {
    config: SimulationConfig,
    trainer: TrainerInfo,
    honor_delays: bool,
    state: Mutex<SimState>,
}

impl SimulatedDevice {
    pub fn new(config: SimulationConfig) -> Self {
        let state = SimState {
            in_battle: false,
            sweeps: 0,
            a_presses: 0,
            flee_armed: false,
            loaded: None,
            rng: StdRng::seed_from_u64(config.seed),
            scripted_entities: VecDeque::new(),
            battle_overrides: VecDeque::new(),
            read_overrides: VecDeque::new(),
            menu_overrides: VecDeque::new(),
            fail_press_and_hold: false,
            disconnect_after: None,
            calls: Vec::new(),
        };
        Self {
            config,
            trainer: TrainerInfo {
                name: "SIM".to_string(),
                trainer_id: 12_345,
                secret_id: 54_321,
                game: "simulated".to_string(),
            },
            honor_delays: true,
            state: Mutex::new(state),
        }
    }

    /// Skip the waits real hardware would take.
    #[must_use]
    pub const fn with_delays(mut self, honor: bool) -> Self {
        self.honor_delays = honor;
        self
    }

    #[must_use]
    pub fn with_trainer(mut self, trainer: TrainerInfo) -> Self {
        self.trainer = trainer;
        self
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entities rolled by upcoming encounters, before random generation.
    pub fn queue_entities(&self, entities: impl IntoIterator<Item = EncounterEntity>) {
        self.state().scripted_entities.extend(entities);
    }

    /// Results for upcoming `read_until_present` calls.
    pub fn queue_reads(&self, reads: impl IntoIterator<Item = Option<EncounterEntity>>) {
        self.state().read_overrides.extend(reads);
    }

    /// Results for upcoming `is_in_battle` calls.
    pub fn queue_battle_states(&self, states: impl IntoIterator<Item = bool>) {
        self.state().battle_overrides.extend(states);
    }

    /// Results for upcoming `read_until_changed` calls.
    pub fn queue_menu_samples(&self, samples: impl IntoIterator<Item = bool>) {
        self.state().menu_overrides.extend(samples);
    }

    /// Put the model into (or out of) a battle with `entity` loaded.
    pub fn set_battle(&self, entity: Option<EncounterEntity>) {
        let mut state = self.state();
        state.in_battle = entity.is_some();
        state.loaded = entity;
    }

    pub fn fail_press_and_hold(&self, fail: bool) {
        self.state().fail_press_and_hold = fail;
    }

    /// Every call after the first `calls` journal entries fails as disconnected.
    pub fn disconnect_after(&self, calls: usize) {
        self.state().disconnect_after = Some(calls);
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state().calls.clone()
    }

    pub fn count(&self, call: &DeviceCall) -> usize {
        self.state().calls.iter().filter(|c| *c == call).count()
    }

    pub fn in_battle(&self) -> bool {
        self.state().in_battle
    }

    /// Record the call, failing it if the simulated link is down.
    fn record(&self, call: DeviceCall) -> DeviceResult<MutexGuard<'_, SimState>> {
        let mut state = self.state();
        if let Some(limit) = state.disconnect_after {
            if state.calls.len() >= limit {
                return Err(DeviceError::Disconnected(format!(
                    "simulated link dropped before {call:?}"
                )));
            }
        }
        state.calls.push(call);
        Ok(state)
    }

    async fn wait(&self, duration: Duration) {
        if self.honor_delays && !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[async_trait]
impl SwitchDevice for SimulatedDevice {
    async fn click(&self, button: Button, delay: Duration) -> DeviceResult<()> {
        {
            let mut state = self.record(DeviceCall::Click(button))?;
            if state.in_battle {
                match button {
                    Button::DUp => state.flee_armed = true,
                    Button::A if state.flee_armed => state.end_battle(),
                    _ => {}
                }
            } else if button == Button::A {
                if state.loaded.is_none() {
                    let entity = state.roll_entity(&self.config);
                    state.loaded = Some(entity);
                }
                state.a_presses += 1;
                if state.a_presses >= self.config.trigger_presses.max(1) {
                    state.start_battle(&self.config);
                }
            }
        }
        self.wait(delay).await;
        Ok(())
    }

    async fn press_and_hold(
        &self,
        button: Button,
        hold: Duration,
        delay: Duration,
    ) -> DeviceResult<()> {
        {
            let state = self.record(DeviceCall::PressAndHold(button))?;
            if state.fail_press_and_hold {
                return Err(DeviceError::CommandRejected {
                    command: format!("press {button:?}"),
                    reason: "simulated failure".to_string(),
                });
            }
        }
        self.wait(hold + delay).await;
        Ok(())
    }

    async fn set_stick(
        &self,
        _stick: Stick,
        x: i16,
        y: i16,
        duration: Duration,
    ) -> DeviceResult<()> {
        {
            let mut state = self.record(DeviceCall::SetStick { x, y })?;
            if (x, y) != (0, 0) && !state.in_battle {
                state.sweeps += 1;
                if state.sweeps >= self.config.encounter_every_sweeps.max(1) {
                    state.loaded = None;
                    state.start_battle(&self.config);
                }
            }
        }
        self.wait(duration).await;
        Ok(())
    }

    async fn read_until_present(
        &self,
        offset: u32,
        timeout: Duration,
        _interval: Duration,
    ) -> DeviceResult<Option<EncounterEntity>> {
        let read = {
            let mut state = self.record(DeviceCall::ReadUntilPresent(offset))?;
            match state.read_overrides.pop_front() {
                Some(scripted) => scripted,
                None => state.loaded.clone(),
            }
        };
        if read.is_none() {
            self.wait(timeout).await;
        }
        Ok(read)
    }

    async fn read_until_changed(
        &self,
        offset: u32,
        _expected: &[u8],
        timeout: Duration,
        _interval: Duration,
        _exact: bool,
    ) -> DeviceResult<bool> {
        let matched = {
            let mut state = self.record(DeviceCall::ReadUntilChanged(offset))?;
            match state.menu_overrides.pop_front() {
                Some(scripted) => scripted,
                None => state.in_battle,
            }
        };
        if !matched {
            self.wait(timeout).await;
        }
        Ok(matched)
    }

    async fn is_in_battle(&self) -> DeviceResult<bool> {
        let mut state = self.record(DeviceCall::IsInBattle)?;
        Ok(match state.battle_overrides.pop_front() {
            Some(scripted) => scripted,
            None => state.in_battle,
        })
    }

    async fn close_program(&self, timing: &TimingConfig) -> DeviceResult<()> {
        {
            let mut state = self.record(DeviceCall::CloseProgram)?;
            state.end_battle();
            state.sweeps = 0;
            state.a_presses = 0;
        }
        self.wait(CLOSE_DELAY.saturating_add(timing.close_extra())).await;
        Ok(())
    }

    async fn start_program(&self, timing: &TimingConfig) -> DeviceResult<()> {
        {
            let mut state = self.record(DeviceCall::StartProgram)?;
            let entity = state.roll_entity(&self.config);
            state.loaded = Some(entity);
        }
        self.wait(START_DELAY.saturating_add(timing.startup_extra())).await;
        Ok(())
    }

    async fn start_program_slow(&self, timing: &TimingConfig) -> DeviceResult<()> {
        {
            let mut state = self.record(DeviceCall::StartProgramSlow)?;
            let entity = state.roll_entity(&self.config);
            state.loaded = Some(entity);
        }
        self.wait(SLOW_START_DELAY.saturating_add(timing.startup_extra())).await;
        Ok(())
    }

    async fn identify_trainer(&self) -> DeviceResult<TrainerInfo> {
        drop(self.record(DeviceCall::IdentifyTrainer)?);
        Ok(self.trainer.clone())
    }

    async fn detach_controller(&self) -> DeviceResult<()> {
        drop(self.record(DeviceCall::DetachController)?);
        Ok(())
    }
}
