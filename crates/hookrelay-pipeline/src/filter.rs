//! Decides whether an inbound event should be processed at all.

use hookrelay_core::config::FilterRule;
use hookrelay_core::error::MSG_MISSING_EMAIL;
use hookrelay_core::types::InboundEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EventNameMismatch,
    SegmentMismatch,
    MissingEmail,
}

impl RejectReason {
    pub fn status(&self) -> u16 {
        match self {
            RejectReason::EventNameMismatch | RejectReason::SegmentMismatch => 204,
            RejectReason::MissingEmail => 400,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::EventNameMismatch => "not processed: event name did not match",
            RejectReason::SegmentMismatch => "not processed: segment name did not match",
            RejectReason::MissingEmail => MSG_MISSING_EMAIL,
        }
    }

    /// Mismatches are routine; a missing email is a bad event.
    pub fn is_fault(&self) -> bool {
        matches!(self, RejectReason::MissingEmail)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    Reject(RejectReason),
}

/// Check `event` against the optional rule, then require an email.
///
/// The segment check only applies when `_audience_friendly` is a string;
/// an absent or non-string value lets the event through.
pub fn accepts(event: &InboundEvent, rule: Option<&FilterRule>) -> FilterDecision {
    if let Some(rule) = rule {
        if let Some(name) = rule.name() {
            if event.name() != name {
                return FilterDecision::Reject(RejectReason::EventNameMismatch);
            }
        }

        if let (Some(segment), Some(audience)) = (rule.segment(), event.audience()) {
            if audience != segment {
                return FilterDecision::Reject(RejectReason::SegmentMismatch);
            }
        }
    }

    if event.email().is_none() {
        return FilterDecision::Reject(RejectReason::MissingEmail);
    }

    FilterDecision::Accept
}
