//! Encounter routines and mode dispatch.

pub mod fixed_encounter;
pub mod line_search;

use async_trait::async_trait;

use crate::application::session::Session;
use crate::domain::errors::SessionResult;
use crate::domain::models::{EncounterEntity, EncounterMode, FixedEncounterProfile, SweepAxis};

pub use fixed_encounter::FixedEncounterRoutine;
pub use line_search::LineSearchRoutine;

/// One acquisition strategy.
#[async_trait]
pub trait EncounterRoutine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Drive the session until an encounter matches.
    ///
    /// # Returns
    /// * `Ok(Some(entity))` - the matching encounter
    /// * `Ok(None)` - the loop ended because the session was cancelled or the
    ///   routine was deselected
    async fn run(&self, session: &mut Session) -> SessionResult<Option<EncounterEntity>>;
}

/// Routine for `mode`. Anything without a dedicated routine walks a vertical line.
pub fn dispatch(mode: EncounterMode) -> Box<dyn EncounterRoutine> {
    if let Some(profile) = FixedEncounterProfile::for_mode(mode) {
        return Box::new(FixedEncounterRoutine::new(profile));
    }
    let axis = match mode {
        EncounterMode::HorizontalLine => SweepAxis::Horizontal,
        _ => SweepAxis::Vertical,
    };
    Box::new(LineSearchRoutine::new(axis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_line_modes() {
        assert_eq!(dispatch(EncounterMode::VerticalLine).name(), "vertical line search");
        assert_eq!(dispatch(EncounterMode::HorizontalLine).name(), "horizontal line search");
    }

    #[test]
    fn test_unspecified_falls_back_to_line_search() {
        assert_eq!(dispatch(EncounterMode::Unspecified).name(), "vertical line search");
        let parsed: EncounterMode = "definitely_not_a_mode".parse().unwrap_or_default();
        assert_eq!(dispatch(parsed).name(), "vertical line search");
    }

    #[test]
    fn test_fixed_modes_use_their_profile() {
        assert_eq!(dispatch(EncounterMode::Eternatus).name(), "Eternatus");
        assert_eq!(dispatch(EncounterMode::Regi).name(), "Regi");
        assert_eq!(dispatch(EncounterMode::Colossal).name(), "Regigigas");
        assert_eq!(dispatch(EncounterMode::LegendaryBirds).name(), "legendary bird");
        assert_eq!(dispatch(EncounterMode::LegendaryDogs).name(), "legendary dog");
    }
}
