//! Common test utilities for integration tests
//!
//! Shared fixtures for driving full sessions against the simulated console.

use std::sync::Arc;

use encounter_bot::domain::models::{Config, EncounterMode, SimulationConfig, STAT_COUNT};
use encounter_bot::infrastructure::device::{DeviceCall, SimulatedDevice};
use encounter_bot::{EncounterBot, EncounterEntity, SwitchDevice};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Entity with every stat at 31.
#[allow(dead_code)]
pub fn perfect(species: u16) -> EncounterEntity {
    EncounterEntity::new(species, [31; STAT_COUNT], false)
}

/// Entity one point short of perfect in the last slot.
#[allow(dead_code)]
pub fn near_miss(species: u16) -> EncounterEntity {
    EncounterEntity::new(species, [31, 31, 31, 31, 31, 30], false)
}

/// Simulation where every sweep starts a battle.
#[allow(dead_code)]
pub fn eager_simulation() -> SimulationConfig {
    SimulationConfig {
        encounter_every_sweeps: 1,
        ..SimulationConfig::default()
    }
}

/// Simulation where walking never starts a battle.
#[allow(dead_code)]
pub fn quiet_simulation() -> SimulationConfig {
    SimulationConfig {
        encounter_every_sweeps: u32::MAX,
        ..SimulationConfig::default()
    }
}

pub fn config_for(mode: EncounterMode) -> Config {
    let mut config = Config::default();
    config.encounter.mode = mode;
    config
}

/// Bot wired to a fresh simulated device.
pub fn bot_with(config: Config, simulation: SimulationConfig) -> (Arc<SimulatedDevice>, EncounterBot) {
    let device = Arc::new(SimulatedDevice::new(simulation));
    let bot = EncounterBot::new(Arc::clone(&device) as Arc<dyn SwitchDevice>, config)
        .expect("default stop conditions are valid");
    (device, bot)
}

/// Assert the session ended with exactly one cleanup as its final calls.
#[allow(dead_code)]
pub fn assert_cleaned_up_once(device: &SimulatedDevice) {
    let calls = device.calls();
    assert_eq!(device.count(&DeviceCall::DetachController), 1, "cleanup must run once");
    assert_eq!(
        &calls[calls.len() - 2..],
        &[DeviceCall::SetStick { x: 0, y: 0 }, DeviceCall::DetachController]
    );
}
