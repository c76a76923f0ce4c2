//! Outbound delivery trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::OutboundPayload;

/// Where enriched payloads are delivered.
#[async_trait]
pub trait Destination: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one payload. Any failure is terminal; callers do not retry.
    async fn deliver(&self, payload: &OutboundPayload) -> Result<()>;
}
