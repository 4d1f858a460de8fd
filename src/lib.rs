// Public API - the runner module and the error taxonomy
pub mod runner;

pub use error::EtlError;

// Internal modules - organized by subsystem
mod config;
mod db;
mod error;
mod locator;
mod store;
mod transfer;
mod transform;
