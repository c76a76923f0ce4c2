//! Inbound analytics event and its heterogeneous property bag.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RelayError, Result};

pub const PROP_EMAIL: &str = "email";
pub const PROP_AUDIENCE: &str = "_audience_friendly";
pub const PROP_HOURLY: &str = "hourly";

/// Property name → value.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single property value as sent by the analytics platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<PropertyValue>),
    Map(Properties),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Properties> {
        match self {
            PropertyValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

/// Track event delivered by the inbound webhook.
///
/// Every field is optional on the wire. The event name is read from `event`,
/// falling back to `eventName` when `event` is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboundEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "event", skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(rename = "eventName", skip_serializing_if = "Option::is_none")]
    pub event_name_alt: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub properties: Properties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

impl InboundEvent {
    /// Decode a raw webhook body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| RelayError::decoding(e.to_string()))
    }

    /// Event name, empty when the event carried none.
    pub fn name(&self) -> &str {
        self.event_name
            .as_deref()
            .or(self.event_name_alt.as_deref())
            .unwrap_or_default()
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Recipient address. Only string values count.
    pub fn email(&self) -> Option<&str> {
        self.property(PROP_EMAIL).and_then(PropertyValue::as_str)
    }

    /// Friendly name of the audience segment that triggered the event.
    pub fn audience(&self) -> Option<&str> {
        self.property(PROP_AUDIENCE).and_then(PropertyValue::as_str)
    }

    /// Per-hour engagement counters, keyed by hour label.
    pub fn hourly(&self) -> Option<&Properties> {
        self.property(PROP_HOURLY).and_then(PropertyValue::as_map)
    }
}
