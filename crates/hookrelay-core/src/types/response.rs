//! Uniform `{status, message}` body returned for every terminal outcome.

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

pub const MSG_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: u16,
    pub message: String,
}

impl StatusBody {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn success() -> Self {
        Self::new(200, MSG_SUCCESS)
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({ "status": self.status, "message": self.message }).to_string()
    }
}

impl From<&RelayError> for StatusBody {
    fn from(err: &RelayError) -> Self {
        Self::new(err.status_code(), err.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MSG_NO_RECOMMENDATION;

    #[test]
    fn test_to_json() {
        let body = StatusBody::new(204, "not processed: event name did not match");
        let parsed: serde_json::Value = serde_json::from_str(&body.to_json()).unwrap();
        assert_eq!(parsed["status"], 204);
        assert_eq!(parsed["message"], "not processed: event name did not match");
    }

    #[test]
    fn test_from_error() {
        let body = StatusBody::from(&RelayError::unavailable("no items"));
        assert_eq!(body, StatusBody::new(500, MSG_NO_RECOMMENDATION));
    }

    #[test]
    fn test_success() {
        let parsed: StatusBody = serde_json::from_str(&StatusBody::success().to_json()).unwrap();
        assert_eq!(parsed.status, 200);
        assert_eq!(parsed.message, MSG_SUCCESS);
    }
}
