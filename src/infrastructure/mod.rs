//! Infrastructure layer module
//!
//! Adapters and ambient concerns:
//! - Simulated console device
//! - Encounter file dumping
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod device;
pub mod dump;
pub mod logging;
