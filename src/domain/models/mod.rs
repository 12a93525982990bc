pub mod config;
pub mod encounter;
pub mod script;

pub use config::{
    Config, DebounceConfig, DeviceConfig, DumpConfig, EncounterConfig, LoggingConfig, MatchPolicy,
    OffsetsConfig, ShinyTarget, SimulationConfig, StopConditionsConfig, TimingConfig,
};
pub use encounter::{
    BotRoutine, Button, EncounterEntity, EncounterKind, EncounterMode, RoutineOutcome,
    SearchResult, SessionOutcome, StatVector, Stick, SweepAxis, TrainerInfo, STAT_COUNT,
};
pub use script::{FixedEncounterProfile, MemorySlot, ReadStrategy, ResetSpeed, ScriptStep};
