//! Webhook destination: POST the payload as JSON to a configured URL.

use async_trait::async_trait;
use hookrelay_core::config::DestinationEndpoint;
use hookrelay_core::error::{RelayError, Result};
use hookrelay_core::traits::Destination;
use hookrelay_core::types::OutboundPayload;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

/// Webhook destination.
pub struct WebhookDestination {
    name: String,
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl WebhookDestination {
    pub fn new(name: &str, endpoint: &DestinationEndpoint, client: reqwest::Client) -> Self {
        Self {
            name: name.to_string(),
            url: endpoint.url.clone(),
            api_key: endpoint.api_key.clone(),
            client,
        }
    }
}

#[async_trait]
impl Destination for WebhookDestination {
    fn name(&self) -> &str { &self.name }

    async fn deliver(&self, payload: &OutboundPayload) -> Result<()> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| RelayError::Serialization(e.to_string()))?;

        let resp = self.client.post(&self.url)
            .header(AUTHORIZATION, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| RelayError::transport(format!("{} send failed: {e}", self.name)))?;

        // Only the status matters; the response is released here either way.
        let status = resp.status();
        drop(resp);

        if status != StatusCode::OK {
            tracing::warn!("{} rejected payload with {status}", self.name);
            return Err(RelayError::transport(format!("{} returned {status}", self.name)));
        }

        tracing::debug!("{} accepted payload", self.name);
        Ok(())
    }
}
