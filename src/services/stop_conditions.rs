//! Default stop-criteria evaluator driven by the `stop_conditions` config.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::models::{
    EncounterEntity, MatchPolicy, ShinyTarget, StopConditionsConfig, STAT_COUNT,
};
use crate::domain::ports::StopCriteriaEvaluator;

/// Errors parsing a target stat string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetIvsError {
    #[error("expected {expected} slots separated by '/', found {found}")]
    WrongSlotCount { expected: usize, found: usize },

    #[error("invalid value '{value}' in slot {slot}: must be 0-31 or a wildcard (_, x, *)")]
    InvalidSlot { slot: usize, value: String },
}

/// Desired value per stat slot; `None` accepts anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetIvs([Option<u8>; STAT_COUNT]);

impl TargetIvs {
    pub const MAX_IV: u8 = 31;

    pub const fn new(slots: [Option<u8>; STAT_COUNT]) -> Self {
        Self(slots)
    }

    pub const fn slots(&self) -> &[Option<u8>; STAT_COUNT] {
        &self.0
    }

    fn slot_matches(target: Option<u8>, actual: u8, policy: MatchPolicy) -> bool {
        match (target, policy) {
            (None, _) => true,
            (Some(want), MatchPolicy::Exact) => actual == want,
            (Some(want), MatchPolicy::AtLeast) => actual >= want,
        }
    }

    pub fn matches(&self, ivs: &[u8; STAT_COUNT], policy: MatchPolicy) -> bool {
        self.0
            .iter()
            .zip(ivs)
            .all(|(target, actual)| Self::slot_matches(*target, *actual, policy))
    }
}

impl FromStr for TargetIvs {
    type Err = TargetIvsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').map(str::trim).collect();
        if parts.len() != STAT_COUNT {
            return Err(TargetIvsError::WrongSlotCount {
                expected: STAT_COUNT,
                found: parts.len(),
            });
        }

        let mut slots = [None; STAT_COUNT];
        for (slot, part) in parts.iter().enumerate() {
            slots[slot] = match *part {
                "_" | "x" | "X" | "*" | "" => None,
                value => match value.parse::<u8>() {
                    Ok(iv) if iv <= Self::MAX_IV => Some(iv),
                    _ => {
                        return Err(TargetIvsError::InvalidSlot {
                            slot,
                            value: value.to_string(),
                        })
                    }
                },
            };
        }
        Ok(Self(slots))
    }
}

impl fmt::Display for TargetIvs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|slot| slot.map_or_else(|| "_".to_string(), |iv| iv.to_string()))
            .collect::<Vec<_>>()
            .join("/");
        f.write_str(&rendered)
    }
}

/// Stat-target, species and shininess filter.
#[derive(Debug, Clone)]
pub struct IvStopConditions {
    targets: TargetIvs,
    policy: MatchPolicy,
    species: Option<u16>,
    shiny_target: ShinyTarget,
}

impl IvStopConditions {
    pub const fn new(targets: TargetIvs, policy: MatchPolicy) -> Self {
        Self {
            targets,
            policy,
            species: None,
            shiny_target: ShinyTarget::DontCare,
        }
    }

    #[must_use]
    pub const fn with_species(mut self, species: Option<u16>) -> Self {
        self.species = species;
        self
    }

    #[must_use]
    pub const fn with_shiny_target(mut self, shiny_target: ShinyTarget) -> Self {
        self.shiny_target = shiny_target;
        self
    }

    /// Build from config, parsing the target string once.
    pub fn from_config(config: &StopConditionsConfig) -> Result<Self, TargetIvsError> {
        let targets = config.target_ivs.parse()?;
        Ok(Self::new(targets, config.match_policy)
            .with_species(config.species)
            .with_shiny_target(config.shiny_target))
    }

    pub const fn targets(&self) -> &TargetIvs {
        &self.targets
    }
}

impl StopCriteriaEvaluator for IvStopConditions {
    fn is_match(&self, entity: &EncounterEntity) -> bool {
        if self.species.is_some_and(|species| species != entity.species) {
            return false;
        }

        let shiny_ok = match self.shiny_target {
            ShinyTarget::DontCare => true,
            ShinyTarget::ShinyOnly => entity.shiny,
            ShinyTarget::NonShiny => !entity.shiny,
        };

        shiny_ok && self.targets.matches(&entity.ivs, self.policy)
    }

    fn describe(&self) -> String {
        let mut parts = vec![format!("IVs {} ({:?})", self.targets, self.policy)];
        if let Some(species) = self.species {
            parts.push(format!("species #{species}"));
        }
        if self.shiny_target != ShinyTarget::DontCare {
            parts.push(format!("{:?}", self.shiny_target));
        }
        parts.join(", ")
    }
}
