//! Full sessions of the fixed-encounter routines against the simulated console.

mod common;

use std::sync::Arc;
use std::time::Duration;

use encounter_bot::domain::models::{Button, EncounterMode, SimulationConfig};
use encounter_bot::infrastructure::device::DeviceCall;
use encounter_bot::SessionOutcome;
use tokio_util::sync::CancellationToken;

use common::{assert_cleaned_up_once, bot_with, config_for, near_miss, perfect};

#[tokio::test(start_paused = true)]
async fn test_three_misses_reset_three_times() {
    let (device, bot) = bot_with(config_for(EncounterMode::Regi), SimulationConfig::default());
    device.queue_entities([near_miss(377), near_miss(378), near_miss(379), perfect(377)]);

    let outcome = bot.run_session(CancellationToken::new()).await.unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Matched {
            entity: perfect(377),
            encounters: 4,
        }
    );
    assert_eq!(device.count(&DeviceCall::CloseProgram), 3);
    assert_eq!(device.count(&DeviceCall::StartProgram), 3);
    assert_eq!(bot.counters().snapshot().legends, 4);
    assert_cleaned_up_once(&device);
}

#[tokio::test(start_paused = true)]
async fn test_each_reset_is_followed_by_full_trigger() {
    let (device, bot) = bot_with(config_for(EncounterMode::Regi), SimulationConfig::default());
    device.queue_entities([near_miss(1), near_miss(2), near_miss(3), perfect(4)]);

    bot.run_session(CancellationToken::new()).await.unwrap();

    let calls = device.calls();
    let mut cycles = 0;
    for (i, call) in calls.iter().enumerate() {
        if *call == DeviceCall::CloseProgram {
            assert_eq!(calls[i + 1], DeviceCall::StartProgram);
            // Trigger: initial A, then A presses until the battle flag is set.
            assert_eq!(calls[i + 2], DeviceCall::Click(Button::A));
            assert_eq!(calls[i + 3], DeviceCall::IsInBattle);
            cycles += 1;
        }
    }
    assert_eq!(cycles, 3);
}

#[tokio::test(start_paused = true)]
async fn test_eternatus_reads_raid_slot() {
    let config = config_for(EncounterMode::Eternatus);
    let raid = config.offsets.raid;
    let (device, bot) = bot_with(config, SimulationConfig::default());
    device.queue_entities([perfect(890)]);

    let outcome = bot.run_session(CancellationToken::new()).await.unwrap();

    // Nothing is loaded before the first restart, so the first read is
    // discarded and only the rerolled entity is evaluated.
    assert_eq!(
        outcome,
        SessionOutcome::Matched {
            entity: perfect(890),
            encounters: 1,
        }
    );
    assert_eq!(device.count(&DeviceCall::CloseProgram), 1);
    assert!(device.calls().contains(&DeviceCall::ReadUntilPresent(raid)));
    assert!(!device.calls().contains(&DeviceCall::IsInBattle));
}

#[tokio::test(start_paused = true)]
async fn test_colossal_uses_slow_reopen() {
    let (device, bot) = bot_with(config_for(EncounterMode::Colossal), SimulationConfig::default());
    device.queue_entities([near_miss(486), perfect(486)]);

    bot.run_session(CancellationToken::new()).await.unwrap();

    assert_eq!(device.count(&DeviceCall::StartProgramSlow), 1);
    assert_eq!(device.count(&DeviceCall::StartProgram), 0);
}

#[tokio::test(start_paused = true)]
async fn test_legendary_dogs_wait_cutscene_then_reset_on_miss() {
    let config = config_for(EncounterMode::LegendaryDogs);
    let legendary = config.offsets.legendary;
    let (device, bot) = bot_with(config, SimulationConfig::default());
    device.queue_entities([near_miss(888), perfect(889)]);

    let started = tokio::time::Instant::now();
    let outcome = bot.run_session(CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.encounters(), 2);
    assert_eq!(device.count(&DeviceCall::CloseProgram), 1);
    assert!(device.calls().contains(&DeviceCall::ReadUntilPresent(legendary)));
    // Two attempts, each waiting out the 15s entry cutscene.
    assert!(started.elapsed() >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_legendary_birds_read_inside_window() {
    let config = config_for(EncounterMode::LegendaryBirds);
    let wild = config.offsets.wild;
    let (device, bot) = bot_with(config, SimulationConfig::default());
    device.queue_entities([near_miss(144), perfect(145)]);

    let outcome = bot.run_session(CancellationToken::new()).await.unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Matched {
            entity: perfect(145),
            encounters: 2,
        }
    );
    assert_eq!(device.count(&DeviceCall::StartProgram), 1);
    assert!(device.calls().contains(&DeviceCall::ReadUntilPresent(wild)));
    assert!(device.calls().contains(&DeviceCall::Click(Button::X)));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_reset_stops_before_next_trigger() {
    let (device, bot) = bot_with(config_for(EncounterMode::Regi), SimulationConfig::default());
    device.queue_entities([near_miss(377)]);
    let token = CancellationToken::new();

    let canceller = token.clone();
    let watcher = Arc::clone(&device);
    tokio::spawn(async move {
        while watcher.count(&DeviceCall::StartProgram) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        canceller.cancel();
    });

    let outcome = bot.run_session(token).await.unwrap();

    assert_eq!(outcome, SessionOutcome::Cancelled { encounters: 1 });
    let calls = device.calls();
    let start = calls
        .iter()
        .position(|call| *call == DeviceCall::StartProgram)
        .unwrap();
    assert_eq!(
        &calls[start + 1..],
        &[DeviceCall::SetStick { x: 0, y: 0 }, DeviceCall::DetachController]
    );
}
