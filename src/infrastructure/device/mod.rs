//! Console adapters implementing the `SwitchDevice` port.

pub mod simulated;

pub use simulated::{DeviceCall, SimulatedDevice};
