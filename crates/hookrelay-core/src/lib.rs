//! # HookRelay Core
//! Shared configuration, error taxonomy, wire types, and the service traits
//! the relay pipeline is built on.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::RelayConfig;
pub use error::{RelayError, Result};
