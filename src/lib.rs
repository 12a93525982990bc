//! Encounter Bot - automated encounter acquisition
//!
//! A control loop that drives a memory-introspectable game console through
//! timed input sequences to trigger, detect and evaluate encounters, stopping
//! only when one satisfies the configured stop conditions.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, ports and errors
//! - **Service Layer** (`services`): guarded device access, debouncing, resets, counters
//! - **Application Layer** (`application`): session, routines and the bot entry point
//! - **Infrastructure Layer** (`infrastructure`): config, logging, dumping, simulated device
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use encounter_bot::{Config, EncounterBot, SimulatedDevice};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let device = Arc::new(SimulatedDevice::new(config.simulation.clone()));
//!     let bot = EncounterBot::new(device, config)?;
//!     let outcome = bot.run_session(CancellationToken::new()).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{EncounterBot, EncounterRoutine, Session};
pub use domain::errors::{DeviceError, DumpError, SessionError};
pub use domain::models::{
    BotRoutine, Config, EncounterEntity, EncounterKind, EncounterMode, SearchResult,
    SessionOutcome,
};
pub use domain::ports::{EncounterDumper, StopCriteriaEvaluator, SwitchDevice};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::device::SimulatedDevice;
pub use services::{IvStopConditions, SessionCounters};
