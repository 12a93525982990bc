//! Encounter domain types: controller inputs, modes, read entities and outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of slots in an entity's stat vector.
pub const STAT_COUNT: usize = 6;

/// Per-slot stat values read from an encounter, passed verbatim to the
/// stop-criteria evaluator.
pub type StatVector = [u8; STAT_COUNT];

/// Buttons exposed by the virtual controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    A,
    B,
    X,
    Y,
    L,
    R,
    Zl,
    Zr,
    Plus,
    Minus,
    Home,
    Capture,
    DUp,
    DDown,
    DLeft,
    DRight,
}

/// Analog sticks exposed by the virtual controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stick {
    Left,
    Right,
}

/// Encounter acquisition strategy.
///
/// Unknown values deserialize to [`EncounterMode::Unspecified`], which the
/// dispatcher treats as a vertical line search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterMode {
    /// Walk back and forth on a vertical line until a wild encounter starts.
    VerticalLine,
    /// Walk back and forth on a horizontal line until a wild encounter starts.
    HorizontalLine,
    /// Soft reset Eternatus.
    Eternatus,
    /// Soft reset the Regi titans.
    Regi,
    /// Soft reset Regigigas.
    #[serde(alias = "giga")]
    Colossal,
    /// Soft reset the Galarian legendary birds.
    #[serde(alias = "ice_thunder", alias = "thunder")]
    LegendaryBirds,
    /// Soft reset the legendary dogs.
    LegendaryDogs,
    /// No (or an unrecognized) mode was configured.
    #[default]
    #[serde(other)]
    Unspecified,
}

impl EncounterMode {
    /// Every selectable mode, in display order.
    pub const ALL: [Self; 7] = [
        Self::VerticalLine,
        Self::HorizontalLine,
        Self::Eternatus,
        Self::Regi,
        Self::Colossal,
        Self::LegendaryBirds,
        Self::LegendaryDogs,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VerticalLine => "vertical_line",
            Self::HorizontalLine => "horizontal_line",
            Self::Eternatus => "eternatus",
            Self::Regi => "regi",
            Self::Colossal => "colossal",
            Self::LegendaryBirds => "legendary_birds",
            Self::LegendaryDogs => "legendary_dogs",
            Self::Unspecified => "unspecified",
        }
    }

    /// Extra names accepted in configuration.
    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Colossal => &["giga"],
            Self::LegendaryBirds => &["ice_thunder", "thunder"],
            _ => &[],
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::VerticalLine => "Walk a vertical line until a wild encounter starts",
            Self::HorizontalLine => "Walk a horizontal line until a wild encounter starts",
            Self::Eternatus => "Soft reset Eternatus",
            Self::Regi => "Soft reset the Regi titans",
            Self::Colossal => "Soft reset Regigigas",
            Self::LegendaryBirds => "Soft reset the Galarian legendary birds",
            Self::LegendaryDogs => "Soft reset the legendary dogs",
            Self::Unspecified => "Falls back to a vertical line search",
        }
    }
}

impl fmt::Display for EncounterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncounterMode {
    type Err = std::convert::Infallible;

    /// Lenient parse: anything unknown becomes `Unspecified`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Ok(match normalized.as_str() {
            "vertical_line" | "verticalline" => Self::VerticalLine,
            "horizontal_line" | "horizontalline" => Self::HorizontalLine,
            "eternatus" => Self::Eternatus,
            "regi" => Self::Regi,
            "colossal" | "giga" => Self::Colossal,
            "legendary_birds" | "ice_thunder" | "thunder" => Self::LegendaryBirds,
            "legendary_dogs" | "legendarydogs" => Self::LegendaryDogs,
            _ => Self::Unspecified,
        })
    }
}

/// Which routine the live configuration asks the bot to run.
///
/// Routines re-read this every loop iteration; switching away from
/// `Encounter` stops the running routine without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotRoutine {
    #[default]
    Idle,
    Encounter,
}

/// Axis walked by the line-search routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAxis {
    Vertical,
    Horizontal,
}

impl SweepAxis {
    /// Stick vector for a sweep of `magnitude` along this axis.
    pub const fn vector(self, magnitude: i16) -> (i16, i16) {
        match self {
            Self::Vertical => (0, magnitude),
            Self::Horizontal => (magnitude, 0),
        }
    }
}

/// Whether an encounter came from a fixed (legendary) routine.
///
/// Only decides which shared counter and dump folder are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterKind {
    Wild,
    Legend,
}

impl EncounterKind {
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Wild => "encounters",
            Self::Legend => "legends",
        }
    }
}

/// Snapshot of one creature read from console memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterEntity {
    pub species: u16,
    pub ivs: StatVector,
    pub shiny: bool,
    /// Raw bytes as read from the device.
    #[serde(default)]
    pub raw: Vec<u8>,
}

impl EncounterEntity {
    pub fn new(species: u16, ivs: StatVector, shiny: bool) -> Self {
        let mut raw = Vec::with_capacity(2 + STAT_COUNT + 1);
        raw.extend_from_slice(&species.to_le_bytes());
        raw.extend_from_slice(&ivs);
        raw.push(u8::from(shiny));
        Self {
            species,
            ivs,
            shiny,
            raw,
        }
    }

    /// Zeroed or empty reads mean the encounter was not set up yet.
    pub fn is_valid(&self) -> bool {
        self.species != 0 && self.raw.iter().any(|b| *b != 0)
    }

    /// `31/31/31/31/31/31` style rendering of the stat vector.
    pub fn ivs_label(&self) -> String {
        self.ivs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for EncounterEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:04} IVs {}", self.species, self.ivs_label())?;
        if self.shiny {
            f.write_str(" (shiny)")?;
        }
        Ok(())
    }
}

/// Host trainer reported by the console at session start.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainerInfo {
    pub name: String,
    pub trainer_id: u16,
    pub secret_id: u16,
    pub game: String,
}

/// Result of one encounter evaluation or routine cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineOutcome {
    Matched,
    Continue,
}

impl RoutineOutcome {
    pub const fn from_matched(matched: bool) -> Self {
        if matched {
            Self::Matched
        } else {
            Self::Continue
        }
    }
}

/// Result of a search-stepping cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    /// Stopped by cancellation or reconfiguration before any battle was seen.
    Aborted,
    /// A battle started during this many sweep iterations; an iteration cut
    /// short by a battle after its first sweep counts. A battle already
    /// running at the loop top adds nothing.
    FoundAfter(u32),
}

/// How an encounter session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionOutcome {
    Matched { entity: EncounterEntity, encounters: u64 },
    Cancelled { encounters: u64 },
    /// The live configuration switched the bot away from encounters.
    Deactivated { encounters: u64 },
}

impl SessionOutcome {
    pub const fn encounters(&self) -> u64 {
        match self {
            Self::Matched { encounters, .. }
            | Self::Cancelled { encounters }
            | Self::Deactivated { encounters } => *encounters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_entity_is_invalid() {
        let zeroed = EncounterEntity {
            species: 0,
            ivs: [0; STAT_COUNT],
            shiny: false,
            raw: vec![0; 16],
        };
        assert!(!zeroed.is_valid());

        let empty = EncounterEntity {
            species: 25,
            ivs: [31; STAT_COUNT],
            shiny: false,
            raw: Vec::new(),
        };
        assert!(!empty.is_valid());

        assert!(EncounterEntity::new(25, [31; STAT_COUNT], false).is_valid());
    }

    #[test]
    fn test_entity_display() {
        let entity = EncounterEntity::new(890, [31, 31, 31, 31, 31, 30], true);
        assert_eq!(entity.to_string(), "#0890 IVs 31/31/31/31/31/30 (shiny)");
    }

    #[test]
    fn test_mode_deserializes_aliases_and_unknowns() {
        let giga: EncounterMode = serde_yaml::from_str("giga").unwrap();
        assert_eq!(giga, EncounterMode::Colossal);

        let birds: EncounterMode = serde_yaml::from_str("ice_thunder").unwrap();
        assert_eq!(birds, EncounterMode::LegendaryBirds);

        let unknown: EncounterMode = serde_yaml::from_str("surfing").unwrap();
        assert_eq!(unknown, EncounterMode::Unspecified);
    }

    #[test]
    fn test_mode_from_str_is_lenient() {
        let parse = |s: &str| s.parse::<EncounterMode>().unwrap();
        assert_eq!(parse("Horizontal-Line"), EncounterMode::HorizontalLine);
        assert_eq!(parse("thunder"), EncounterMode::LegendaryBirds);
        assert_eq!(parse(""), EncounterMode::Unspecified);
    }

    #[test]
    fn test_sweep_vectors() {
        assert_eq!(SweepAxis::Vertical.vector(-30000), (0, -30000));
        assert_eq!(SweepAxis::Horizontal.vector(30000), (30000, 0));
    }
}
