//! Domain layer for the encounter controller
//!
//! This module contains the core models, port traits and error types.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DeviceError, DeviceResult, DumpError, SessionError, SessionResult};
