//! Scripted input sequences and fixed-encounter profiles.
//!
//! Fixed encounters only differ in how they are triggered, where the entity
//! is read from and how fast the game reopens. Those differences live here as
//! data so a single routine can drive all of them.

use std::time::Duration;

use super::config::OffsetsConfig;
use super::encounter::{Button, EncounterMode};

/// One step of a scripted input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Press a button, then wait `delay`.
    Click { button: Button, delay: Duration },
    /// Hold the left stick at `(x, y)` for `duration`.
    Stick { x: i16, y: i16, duration: Duration },
    /// Release the left stick.
    ResetStick,
    /// Fixed delay.
    Wait(Duration),
    /// Keep pressing `button` until the console reports a battle.
    ClickUntilInBattle { button: Button, delay: Duration },
    /// Debounce-confirm that the battle menu is ready.
    ConfirmBattleMenu,
    /// Run from the current battle until the console reports none.
    FleeUntilClear,
    /// Progress message for the log.
    Announce(&'static str),
}

impl ScriptStep {
    pub const fn click(button: Button, delay_ms: u64) -> Self {
        Self::Click {
            button,
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub const fn stick(x: i16, y: i16, duration_ms: u64) -> Self {
        Self::Stick {
            x,
            y,
            duration: Duration::from_millis(duration_ms),
        }
    }

    pub const fn wait(ms: u64) -> Self {
        Self::Wait(Duration::from_millis(ms))
    }

    pub const fn click_until_in_battle(button: Button, delay_ms: u64) -> Self {
        Self::ClickUntilInBattle {
            button,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Memory slot an encounter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemorySlot {
    Wild,
    Raid,
    Legendary,
}

impl MemorySlot {
    pub const fn offset(self, offsets: &OffsetsConfig) -> u32 {
        match self {
            Self::Wild => offsets.wild,
            Self::Raid => offsets.raid,
            Self::Legendary => offsets.legendary,
        }
    }
}

/// How the entity read is attempted after the trigger ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    /// One bounded read.
    Once,
    /// While no battle has started, wait `poll_every` and read again, until
    /// `total` has elapsed.
    Window { total: Duration, poll_every: Duration },
}

/// Which reopen profile the reset uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetSpeed {
    Fast,
    /// For areas with a known long load time.
    Slow,
}

/// Everything that distinguishes one fixed encounter from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedEncounterProfile {
    pub name: &'static str,
    pub trigger: Vec<ScriptStep>,
    pub slot: MemorySlot,
    pub read_timeout: Duration,
    pub read_interval: Duration,
    pub read: ReadStrategy,
    /// Runs between a valid read and evaluation.
    pub settle: Vec<ScriptStep>,
    pub reset: ResetSpeed,
}

const READ_INTERVAL: Duration = Duration::from_millis(200);

impl FixedEncounterProfile {
    /// Profile for a fixed-encounter mode, `None` for line-search modes.
    pub fn for_mode(mode: EncounterMode) -> Option<Self> {
        match mode {
            EncounterMode::Eternatus => Some(Self::eternatus()),
            EncounterMode::Regi => Some(Self::regi()),
            EncounterMode::Colossal => Some(Self::colossal()),
            EncounterMode::LegendaryBirds => Some(Self::legendary_birds()),
            EncounterMode::LegendaryDogs => Some(Self::legendary_dogs()),
            EncounterMode::VerticalLine
            | EncounterMode::HorizontalLine
            | EncounterMode::Unspecified => None,
        }
    }

    pub fn eternatus() -> Self {
        Self {
            name: "Eternatus",
            trigger: vec![ScriptStep::stick(0, 20_000, 1_000), ScriptStep::ResetStick],
            slot: MemorySlot::Raid,
            read_timeout: Duration::from_millis(2_000),
            read_interval: READ_INTERVAL,
            read: ReadStrategy::Once,
            settle: Vec::new(),
            reset: ResetSpeed::Fast,
        }
    }

    pub fn regi() -> Self {
        Self {
            name: "Regi",
            trigger: vec![
                ScriptStep::click(Button::A, 250),
                ScriptStep::Announce("Activating Regi encounter."),
                ScriptStep::click_until_in_battle(Button::A, 250),
            ],
            slot: MemorySlot::Wild,
            read_timeout: Duration::from_millis(500),
            read_interval: READ_INTERVAL,
            read: ReadStrategy::Once,
            settle: Vec::new(),
            reset: ResetSpeed::Fast,
        }
    }

    pub fn colossal() -> Self {
        Self {
            name: "Regigigas",
            trigger: vec![
                ScriptStep::click(Button::A, 500),
                ScriptStep::Announce("Activating Regigigas encounter."),
                ScriptStep::click_until_in_battle(Button::A, 250),
            ],
            slot: MemorySlot::Raid,
            read_timeout: Duration::from_millis(500),
            read_interval: READ_INTERVAL,
            read: ReadStrategy::Once,
            settle: Vec::new(),
            reset: ResetSpeed::Slow,
        }
    }

    pub fn legendary_birds() -> Self {
        Self {
            name: "legendary bird",
            trigger: vec![
                ScriptStep::ConfirmBattleMenu,
                ScriptStep::FleeUntilClear,
                ScriptStep::Announce("Activating bird encounter."),
                ScriptStep::wait(2_000),
                ScriptStep::click(Button::A, 500),
                ScriptStep::Announce("Setting up camp."),
                ScriptStep::click(Button::X, 1_500),
                ScriptStep::click(Button::A, 7_000),
                ScriptStep::Announce("Exiting camp."),
                ScriptStep::click(Button::B, 1_000),
                ScriptStep::click(Button::A, 2_000),
            ],
            slot: MemorySlot::Wild,
            read_timeout: Duration::from_millis(500),
            read_interval: READ_INTERVAL,
            read: ReadStrategy::Window {
                total: Duration::from_millis(4_000),
                poll_every: Duration::from_millis(2_000),
            },
            settle: Vec::new(),
            reset: ResetSpeed::Fast,
        }
    }

    pub fn legendary_dogs() -> Self {
        Self {
            name: "legendary dog",
            trigger: vec![
                ScriptStep::Announce("Looking for a new dog..."),
                // Dismiss the prompt left over from the previous attempt.
                ScriptStep::click(Button::A, 500),
                ScriptStep::stick(0, 30_000, 1_000),
                ScriptStep::click(Button::A, 600),
                ScriptStep::click(Button::A, 2_600),
                ScriptStep::click_until_in_battle(Button::A, 1_000),
            ],
            slot: MemorySlot::Legendary,
            read_timeout: Duration::from_millis(2_000),
            read_interval: READ_INTERVAL,
            read: ReadStrategy::Once,
            settle: vec![
                ScriptStep::ResetStick,
                // Entry cutscene.
                ScriptStep::wait(15_000),
                ScriptStep::ConfirmBattleMenu,
            ],
            reset: ResetSpeed::Fast,
        }
    }
}
