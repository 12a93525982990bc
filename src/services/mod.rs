pub mod counters;
pub mod debounce;
pub mod recovery;
pub mod remote;
pub mod stop_conditions;

pub use counters::{CountsSnapshot, SessionCounters};
pub use debounce::{DebouncedReader, BATTLE_MENU_READY};
pub use recovery::RecoveryManager;
pub use remote::Remote;
pub use stop_conditions::{IvStopConditions, TargetIvs, TargetIvsError};
