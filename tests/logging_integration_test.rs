// Integration test for file logging
// Initializes the global subscriber, so it lives alone in this binary.

mod common;

use std::fs;

use encounter_bot::domain::models::{EncounterMode, SimulationConfig};
use encounter_bot::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use common::{bot_with, config_for, perfect};

#[test]
fn test_session_logs_to_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        level: "info".to_string(),
        format: LogFormat::Json,
        log_dir: Some(temp_dir.path().to_path_buf()),
        enable_console: false,
        rotation: RotationPolicy::Never,
    };

    let logger = LoggerImpl::init(&config).unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();
    runtime.block_on(async {
        let (device, bot) = bot_with(config_for(EncounterMode::Regi), SimulationConfig::default());
        device.queue_entities([perfect(377)]);
        bot.run_session(CancellationToken::new()).await.unwrap();
    });

    // Dropping the logger flushes the non-blocking writer.
    drop(logger);

    let contents = fs::read_to_string(temp_dir.path().join("encounter-bot.log")).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "encounter"));
    assert!(lines
        .iter()
        .any(|line| line["span"]["name"] == "session" && line["span"]["mode"] == "regi"));
    assert!(lines
        .iter()
        .any(|line| line["fields"]["message"] == "session finished"));
}
