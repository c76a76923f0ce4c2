//! Recommendation blob and the destination-shaped outbound payload.

use serde::{Deserialize, Serialize};

/// One content recommendation as returned by the recommendation service.
/// The shape belongs to that service; it is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendation(pub serde_json::Value);

impl Recommendation {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

/// Transmission body in the shape the destination expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundPayload {
    pub recipients: Vec<Recipient>,
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SendOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub address: String,
    pub substitution_data: SubstitutionData,
}

/// Dynamic template data; the recommendation is exposed to the template as `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionData {
    pub data: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub template_id: String,
}

/// Scheduling directive. Absence means "send now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendOptions {
    pub start_time: String,
}

impl OutboundPayload {
    pub fn new(address: impl Into<String>, data: Recommendation, template_id: impl Into<String>) -> Self {
        Self {
            recipients: vec![Recipient {
                address: address.into(),
                substitution_data: SubstitutionData { data },
            }],
            content: Content { template_id: template_id.into() },
            options: None,
        }
    }

    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        self.options = Some(SendOptions { start_time: start_time.into() });
        self
    }

    /// Address of the first (and only) recipient.
    pub fn address(&self) -> Option<&str> {
        self.recipients.first().map(|r| r.address.as_str())
    }

    pub fn start_time(&self) -> Option<&str> {
        self.options.as_ref().map(|o| o.start_time.as_str())
    }
}
