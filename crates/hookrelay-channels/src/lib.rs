//! # HookRelay Channels
//! Outbound delivery of enriched payloads.

pub mod webhook;

use hookrelay_core::config::RelayConfig;
use hookrelay_core::error::Result;
use hookrelay_core::traits::Destination;

pub use webhook::WebhookDestination;

/// Create the configured destination, sharing `client`.
pub fn create_destination(config: &RelayConfig, client: reqwest::Client) -> Result<Box<dyn Destination>> {
    let endpoint = config.selected_destination()?;
    Ok(Box::new(WebhookDestination::new(&config.destination, endpoint, client)))
}
