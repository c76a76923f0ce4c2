//! Merge event, recommendation, and schedule into the destination's shape.

use hookrelay_core::config::RelayConfig;
use hookrelay_core::error::{MSG_MISSING_EMAIL, RelayError, Result};
use hookrelay_core::types::{InboundEvent, OutboundPayload, Recommendation};
use hookrelay_scheduler::{Clock, format_start_time, send_time};

/// Build the outbound payload for one accepted event.
///
/// With `optimal_hour` enabled the payload gets `options.start_time` when a
/// future send hour exists; otherwise `options` is left out and the
/// destination sends immediately.
pub fn build_payload(
    event: &InboundEvent,
    recommendation: Recommendation,
    config: &RelayConfig,
    clock: &dyn Clock,
) -> Result<OutboundPayload> {
    let address = event.email().ok_or_else(|| RelayError::validation(MSG_MISSING_EMAIL))?;
    let endpoint = config.selected_destination()?;

    let payload = OutboundPayload::new(address, recommendation, endpoint.template.as_str());
    if !config.optimal_hour {
        return Ok(payload);
    }

    Ok(match send_time(event, clock) {
        Some(at) => payload.with_start_time(format_start_time(at)),
        None => payload,
    })
}
