use crate::domain::models::EncounterEntity;

/// Port for the predicate that decides whether an encounter ends the session.
///
/// The comparison policy belongs to the implementation; the session only
/// asks the question once per valid read.
pub trait StopCriteriaEvaluator: Send + Sync {
    /// Whether `entity` satisfies every stop condition.
    fn is_match(&self, entity: &EncounterEntity) -> bool;

    /// Short human description of the criteria, for logs.
    fn describe(&self) -> String {
        String::from("custom stop criteria")
    }
}
