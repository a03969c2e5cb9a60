//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod saver;
pub mod store;
pub mod telemetry;
