pub mod encounter_bot;
pub mod routines;
pub mod session;

pub use encounter_bot::EncounterBot;
pub use routines::{dispatch, EncounterRoutine, FixedEncounterRoutine, LineSearchRoutine};
pub use session::Session;
