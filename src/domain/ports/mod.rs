//! Port trait definitions (Hexagonal Architecture)
//!
//! The controller depends on these interfaces only:
//! - SwitchDevice: controller input and memory reads on the console
//! - StopCriteriaEvaluator: decides whether an encounter ends the session
//! - EncounterDumper: persists evaluated encounters
pub mod device;
pub mod dumper;
pub mod stop_criteria;

pub use device::SwitchDevice;
pub use dumper::EncounterDumper;
pub use stop_criteria::StopCriteriaEvaluator;
