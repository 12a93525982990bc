use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::encounter::EncounterMode;

/// Main configuration structure for the encounter bot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Encounter routine selection
    #[serde(default)]
    pub encounter: EncounterConfig,

    /// Conditions that end a session
    #[serde(default)]
    pub stop_conditions: StopConditionsConfig,

    /// Encounter dumping
    #[serde(default)]
    pub dump: DumpConfig,

    /// Extra delays around program restarts
    #[serde(default)]
    pub timing: TimingConfig,

    /// Console memory offsets
    #[serde(default)]
    pub offsets: OffsetsConfig,

    /// Battle menu debounce settings
    #[serde(default)]
    pub debounce: DebounceConfig,

    /// Device command bounds
    #[serde(default)]
    pub device: DeviceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulated console used by `encounter-bot simulate`
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Encounter routine selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EncounterConfig {
    /// Acquisition strategy; unknown values fall back to a line search
    #[serde(default)]
    pub mode: EncounterMode,
}

/// How a stat slot is compared against its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Every specified slot must equal its target
    #[default]
    Exact,
    /// Every specified slot must be at least its target
    AtLeast,
}

/// Shininess requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShinyTarget {
    #[default]
    DontCare,
    ShinyOnly,
    NonShiny,
}

/// Stop conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StopConditionsConfig {
    /// Target stat vector, e.g. `31/31/31/31/31/31`; `_`, `x` or `*` match anything
    #[serde(default = "default_target_ivs")]
    pub target_ivs: String,

    /// Slot comparison policy
    #[serde(default)]
    pub match_policy: MatchPolicy,

    /// Only stop on this species
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<u16>,

    /// Shininess requirement
    #[serde(default)]
    pub shiny_target: ShinyTarget,

    /// Hold the capture button after a match
    #[serde(default)]
    pub capture_video_clip: bool,

    /// Delay in milliseconds before the capture button is held
    #[serde(default = "default_extra_time_wait_capture_video_ms")]
    pub extra_time_wait_capture_video_ms: u64,
}

fn default_target_ivs() -> String {
    "31/31/31/31/31/31".to_string()
}

const fn default_extra_time_wait_capture_video_ms() -> u64 {
    10_000
}

impl Default for StopConditionsConfig {
    fn default() -> Self {
        Self {
            target_ivs: default_target_ivs(),
            match_policy: MatchPolicy::default(),
            species: None,
            shiny_target: ShinyTarget::default(),
            capture_video_clip: false,
            extra_time_wait_capture_video_ms: default_extra_time_wait_capture_video_ms(),
        }
    }
}

/// Encounter dumping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DumpConfig {
    /// Write every evaluated encounter to disk
    #[serde(default)]
    pub enabled: bool,

    /// Destination folder; dumping is skipped while empty
    #[serde(default)]
    pub folder: String,
}

impl DumpConfig {
    /// Dumping happens only when enabled and a folder is set.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.folder.trim().is_empty()
    }
}

/// Extra time, in milliseconds, around closing and opening the game
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimingConfig {
    /// Wait for profiles to load when starting the game
    #[serde(default)]
    pub extra_time_load_profile: u64,

    /// Wait to check if DLC is usable
    #[serde(default)]
    pub extra_time_check_dlc: u64,

    /// Wait before clicking A in the title screen
    #[serde(default)]
    pub extra_time_load_game: u64,

    /// Wait after pressing HOME to minimize the game
    #[serde(default)]
    pub extra_time_return_home: u64,

    /// Wait after clicking to close the game
    #[serde(default)]
    pub extra_time_close_game: u64,
}

impl TimingConfig {
    /// Extra time spent closing the game.
    pub fn close_extra(&self) -> Duration {
        Duration::from_millis(
            self.extra_time_return_home
                .saturating_add(self.extra_time_close_game),
        )
    }

    /// Extra time spent starting the game up to the title screen.
    pub fn startup_extra(&self) -> Duration {
        Duration::from_millis(
            self.extra_time_load_profile
                .saturating_add(self.extra_time_check_dlc)
                .saturating_add(self.extra_time_load_game),
        )
    }
}

/// Console memory offsets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OffsetsConfig {
    /// Wild encounter slot
    #[serde(default = "default_wild_offset")]
    pub wild: u32,

    /// Raid / den encounter slot
    #[serde(default = "default_raid_offset")]
    pub raid: u32,

    /// Legendary encounter slot
    #[serde(default = "default_legendary_offset")]
    pub legendary: u32,

    /// Battle menu state flag
    #[serde(default = "default_battle_menu_offset")]
    pub battle_menu: u32,
}

const fn default_wild_offset() -> u32 {
    0x8FEA_3348
}

const fn default_raid_offset() -> u32 {
    0x886A_95B8
}

const fn default_legendary_offset() -> u32 {
    0x886B_C348
}

const fn default_battle_menu_offset() -> u32 {
    0x6B57_8EDC
}

impl Default for OffsetsConfig {
    fn default() -> Self {
        Self {
            wild: default_wild_offset(),
            raid: default_raid_offset(),
            legendary: default_legendary_offset(),
            battle_menu: default_battle_menu_offset(),
        }
    }
}

/// Battle menu debounce settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DebounceConfig {
    /// Consecutive confirmations required
    #[serde(default = "default_debounce_samples")]
    pub samples: u32,

    /// Timeout per confirmation in milliseconds
    #[serde(default = "default_debounce_timeout_ms")]
    pub timeout_ms: u64,

    /// Poll interval within a confirmation in milliseconds
    #[serde(default = "default_debounce_interval_ms")]
    pub interval_ms: u64,
}

const fn default_debounce_samples() -> u32 {
    3
}

const fn default_debounce_timeout_ms() -> u64 {
    5_000
}

const fn default_debounce_interval_ms() -> u64 {
    100
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            samples: default_debounce_samples(),
            timeout_ms: default_debounce_timeout_ms(),
            interval_ms: default_debounce_interval_ms(),
        }
    }
}

/// Device command bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceConfig {
    /// Slack in milliseconds added to every command's expected duration
    #[serde(default = "default_command_slack_ms")]
    pub command_slack_ms: u64,

    /// Upper bound in milliseconds for closing or starting the game
    #[serde(default = "default_program_timeout_ms")]
    pub program_timeout_ms: u64,
}

const fn default_command_slack_ms() -> u64 {
    5_000
}

const fn default_program_timeout_ms() -> u64 {
    120_000
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            command_slack_ms: default_command_slack_ms(),
            program_timeout_ms: default_program_timeout_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Simulated console settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    /// RNG seed for generated encounters
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// A wild battle starts after this many stick sweeps
    #[serde(default = "default_encounter_every_sweeps")]
    pub encounter_every_sweeps: u32,

    /// A fixed battle starts after this many A presses
    #[serde(default = "default_trigger_presses")]
    pub trigger_presses: u32,

    /// One in this many generated encounters is shiny
    #[serde(default = "default_shiny_odds")]
    pub shiny_odds: u32,

    /// Species reported by generated encounters
    #[serde(default = "default_species")]
    pub species: u16,
}

const fn default_seed() -> u64 {
    0x5EED
}

const fn default_encounter_every_sweeps() -> u32 {
    3
}

const fn default_trigger_presses() -> u32 {
    2
}

const fn default_shiny_odds() -> u32 {
    4096
}

const fn default_species() -> u16 {
    144
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            encounter_every_sweeps: default_encounter_every_sweeps(),
            trigger_presses: default_trigger_presses(),
            shiny_odds: default_shiny_odds(),
            species: default_species(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_extras_sum_their_fields() {
        let timing = TimingConfig {
            extra_time_load_profile: 100,
            extra_time_check_dlc: 200,
            extra_time_load_game: 300,
            extra_time_return_home: 40,
            extra_time_close_game: 50,
        };
        assert_eq!(timing.startup_extra(), Duration::from_millis(600));
        assert_eq!(timing.close_extra(), Duration::from_millis(90));
    }

    #[test]
    fn test_timing_extras_saturate() {
        let timing = TimingConfig {
            extra_time_load_profile: u64::MAX,
            extra_time_check_dlc: u64::MAX,
            extra_time_load_game: 1,
            extra_time_return_home: u64::MAX,
            extra_time_close_game: u64::MAX,
        };
        assert_eq!(timing.startup_extra(), Duration::from_millis(u64::MAX));
        assert_eq!(timing.close_extra(), Duration::from_millis(u64::MAX));
    }
}
