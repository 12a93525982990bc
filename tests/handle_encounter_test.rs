//! Evaluation, dumping and capture around a handled encounter, using mocked
//! stop criteria and dumpers.

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use mockall::mock;
use mockall::predicate::*;
use tokio_util::sync::CancellationToken;

use encounter_bot::domain::errors::DumpError;
use encounter_bot::domain::models::{Button, EncounterKind, EncounterMode, SimulationConfig};
use encounter_bot::infrastructure::device::DeviceCall;
use encounter_bot::{EncounterDumper, EncounterEntity, SessionOutcome, StopCriteriaEvaluator};

use common::{bot_with, config_for, near_miss, perfect};

mock! {
    pub Evaluator {}

    impl StopCriteriaEvaluator for Evaluator {
        fn is_match(&self, entity: &EncounterEntity) -> bool;
    }
}

mock! {
    pub Dumper {}

    #[async_trait::async_trait]
    impl EncounterDumper for Dumper {
        async fn dump(&self, kind: EncounterKind, entity: &EncounterEntity) -> Result<PathBuf, DumpError>;
    }
}

#[tokio::test(start_paused = true)]
async fn test_evaluator_sees_each_valid_read_once() {
    let (device, bot) = bot_with(config_for(EncounterMode::Regi), SimulationConfig::default());
    device.queue_entities([near_miss(377), near_miss(378), perfect(379)]);

    let mut evaluator = MockEvaluator::new();
    evaluator
        .expect_is_match()
        .times(3)
        .returning(|entity| entity.species == 379);
    let bot = bot.with_evaluator(Arc::new(evaluator));

    let outcome = bot.run_session(CancellationToken::new()).await.unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Matched {
            entity: perfect(379),
            encounters: 3,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_dumper_receives_legend_encounters() {
    let (device, bot) = bot_with(config_for(EncounterMode::Regi), SimulationConfig::default());
    device.queue_entities([near_miss(377), perfect(377)]);

    let mut dumper = MockDumper::new();
    dumper
        .expect_dump()
        .with(eq(EncounterKind::Legend), always())
        .times(2)
        .returning(|_, _| Ok(PathBuf::from("legends/0377.bin")));
    let bot = bot.with_dumper(Some(Arc::new(dumper)));

    let outcome = bot.run_session(CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.encounters(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dump_failure_does_not_stop_session() {
    let (device, bot) = bot_with(config_for(EncounterMode::Regi), SimulationConfig::default());
    device.queue_entities([near_miss(377), perfect(377)]);

    let mut dumper = MockDumper::new();
    dumper
        .expect_dump()
        .times(2)
        .returning(|_, _| Err(DumpError::MissingFolder));
    let bot = bot.with_dumper(Some(Arc::new(dumper)));

    let outcome = bot.run_session(CancellationToken::new()).await.unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Matched {
            entity: perfect(377),
            encounters: 2,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_capture_failure_keeps_match() {
    let mut config = config_for(EncounterMode::Regi);
    config.stop_conditions.capture_video_clip = true;
    let (device, bot) = bot_with(config, SimulationConfig::default());
    device.queue_entities([perfect(377)]);
    device.fail_press_and_hold(true);

    let outcome = bot.run_session(CancellationToken::new()).await.unwrap();

    assert!(matches!(outcome, SessionOutcome::Matched { encounters: 1, .. }));
    assert_eq!(device.count(&DeviceCall::PressAndHold(Button::Capture)), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_capture_unless_enabled() {
    let (device, bot) = bot_with(config_for(EncounterMode::Regi), SimulationConfig::default());
    device.queue_entities([perfect(377)]);

    bot.run_session(CancellationToken::new()).await.unwrap();

    assert_eq!(device.count(&DeviceCall::PressAndHold(Button::Capture)), 0);
}
