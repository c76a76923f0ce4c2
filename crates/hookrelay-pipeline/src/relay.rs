//! The relay: one inbound webhook body in, one status body out.

use std::sync::Arc;

use hookrelay_core::config::RelayConfig;
use hookrelay_core::error::{RelayError, Result};
use hookrelay_core::traits::{Destination, RecommendationSource};
use hookrelay_core::types::response::MSG_SUCCESS;
use hookrelay_core::types::{InboundEvent, StatusBody};
use hookrelay_providers::fetch_top_recommendation;
use hookrelay_scheduler::{Clock, SystemClock};

use crate::filter::{FilterDecision, RejectReason, accepts};
use crate::payload::build_payload;

/// How a request finished when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Payload accepted by the destination, scheduled for `start_time` if set.
    Delivered { start_time: Option<String> },
    /// Event intentionally not processed.
    Skipped(RejectReason),
}

impl Outcome {
    pub fn status_body(&self) -> StatusBody {
        match self {
            Outcome::Delivered { .. } => StatusBody::new(200, MSG_SUCCESS),
            Outcome::Skipped(reason) => StatusBody::new(reason.status(), reason.message()),
        }
    }
}

/// Shared, read-only request handler. Cheap to clone.
#[derive(Clone)]
pub struct Relay {
    config: Arc<RelayConfig>,
    recommender: Arc<dyn RecommendationSource>,
    destination: Arc<dyn Destination>,
    clock: Arc<dyn Clock>,
}

impl Relay {
    pub fn new(
        config: Arc<RelayConfig>,
        recommender: Arc<dyn RecommendationSource>,
        destination: Arc<dyn Destination>,
    ) -> Self {
        Self {
            config,
            recommender,
            destination,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn destination_name(&self) -> &str {
        self.destination.name()
    }

    /// Run the pipeline for one raw webhook body.
    ///
    /// Steps run strictly in order and the first failure ends the request.
    pub async fn process(&self, body: &[u8]) -> Result<Outcome> {
        let event = InboundEvent::from_slice(body)?;

        match accepts(&event, self.config.filter.as_ref()) {
            FilterDecision::Accept => {}
            FilterDecision::Reject(reason) if reason.is_fault() => {
                return Err(RelayError::validation(reason.message()));
            }
            FilterDecision::Reject(reason) => return Ok(Outcome::Skipped(reason)),
        }

        let email = event
            .email()
            .ok_or_else(|| RelayError::validation(RejectReason::MissingEmail.message()))?;

        let recommendation = fetch_top_recommendation(self.recommender.as_ref(), email).await?;
        let payload = build_payload(&event, recommendation, &self.config, self.clock.as_ref())?;
        self.destination.deliver(&payload).await?;

        Ok(Outcome::Delivered {
            start_time: payload.start_time().map(String::from),
        })
    }

    /// Run the pipeline and turn the result into the caller-facing body.
    pub async fn respond(&self, body: &[u8]) -> StatusBody {
        match self.process(body).await {
            Ok(outcome) => {
                match &outcome {
                    Outcome::Delivered { start_time: Some(at) } => {
                        tracing::info!("delivered to {}, scheduled for {at}", self.destination.name());
                    }
                    Outcome::Delivered { start_time: None } => {
                        tracing::info!("delivered to {} for immediate send", self.destination.name());
                    }
                    Outcome::Skipped(reason) => {
                        tracing::info!("skipped event: {}", reason.message());
                    }
                }
                outcome.status_body()
            }
            Err(err) => {
                match &err {
                    RelayError::Decoding(_) | RelayError::Validation(_) => {
                        tracing::warn!("rejected webhook: {err}");
                    }
                    _ => tracing::error!("webhook failed: {err}"),
                }
                StatusBody::from(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use hookrelay_core::config::FilterRule;
    use hookrelay_core::types::{OutboundPayload, Recommendation};
    use hookrelay_scheduler::FixedClock;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeRecommender {
        recs: Vec<Recommendation>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecommendationSource for FakeRecommender {
        fn name(&self) -> &str { "fake" }

        async fn recommend(&self, _field: &str, _value: &str) -> Result<Vec<Recommendation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.recs.clone())
        }
    }

    #[derive(Default)]
    struct FakeDestination {
        fail_with: Option<u16>,
        delivered: Mutex<Vec<OutboundPayload>>,
    }

    #[async_trait]
    impl Destination for FakeDestination {
        fn name(&self) -> &str { "fake-destination" }

        async fn deliver(&self, payload: &OutboundPayload) -> Result<()> {
            if let Some(status) = self.fail_with {
                return Err(RelayError::transport(format!("fake-destination returned {status}")));
            }
            self.delivered.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    struct Harness {
        relay: Relay,
        recommender: Arc<FakeRecommender>,
        destination: Arc<FakeDestination>,
    }

    fn harness(filter: Option<FilterRule>, recs: Vec<Recommendation>, fail_with: Option<u16>) -> Harness {
        let mut config = RelayConfig::default();
        config.optimal_hour = true;
        config.filter = filter;
        config.destinations.get_mut("sparkpost").unwrap().template = "digest".into();

        let recommender = Arc::new(FakeRecommender { recs, ..Default::default() });
        let destination = Arc::new(FakeDestination { fail_with, ..Default::default() });
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap());

        let relay = Relay::new(Arc::new(config), recommender.clone(), destination.clone())
            .with_clock(Arc::new(clock));
        Harness { relay, recommender, destination }
    }

    fn one_rec() -> Vec<Recommendation> {
        vec![Recommendation::new(json!({"url": "example.com/a", "title": "A"}))]
    }

    const VIEWED: &[u8] =
        br#"{"event":"viewed","properties":{"email":"a@b.com","hourly":{"9":5,"14":12}}}"#;

    #[tokio::test]
    async fn test_scenario_scheduled_delivery() {
        let h = harness(None, one_rec(), None);
        let body = h.relay.respond(VIEWED).await;
        assert_eq!(body, StatusBody::new(200, "success"));

        let delivered = h.destination.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].address(), Some("a@b.com"));
        assert_eq!(delivered[0].content.template_id, "digest");
        assert_eq!(delivered[0].start_time(), Some("2026-10-19T14:00:00Z"));
    }

    #[tokio::test]
    async fn test_process_reports_start_time() {
        let h = harness(None, one_rec(), None);
        let outcome = h.relay.process(VIEWED).await.unwrap();
        assert_eq!(outcome, Outcome::Delivered { start_time: Some("2026-10-19T14:00:00Z".into()) });
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let h = harness(None, one_rec(), None);
        let body = h.relay.respond(b"{not json").await;
        assert_eq!(body, StatusBody::new(500, "unrecognized webhook body"));
        assert_eq!(h.recommender.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_name_mismatch_never_dispatches() {
        let rule = FilterRule { name: Some("purchased".into()), segment: None };
        let h = harness(Some(rule), one_rec(), None);
        let body = h.relay.respond(VIEWED).await;
        assert_eq!(body, StatusBody::new(204, "not processed: event name did not match"));
        assert_eq!(h.recommender.calls.load(Ordering::SeqCst), 0);
        assert!(h.destination.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_segment_mismatch() {
        let rule = FilterRule { name: None, segment: Some("VIP".into()) };
        let h = harness(Some(rule), one_rec(), None);
        let body = h
            .relay
            .respond(br#"{"properties":{"email":"a@b.com","_audience_friendly":"Churn Risk"}}"#)
            .await;
        assert_eq!(body, StatusBody::new(204, "not processed: segment name did not match"));
        assert!(h.destination.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_email_skips_fetch_and_dispatch() {
        let h = harness(None, one_rec(), None);
        let body = h.relay.respond(br#"{"event":"viewed","properties":{"hourly":{"9":1}}}"#).await;
        assert_eq!(body, StatusBody::new(400, "user does not have email"));
        assert_eq!(h.recommender.calls.load(Ordering::SeqCst), 0);
        assert!(h.destination.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_recommendation_no_dispatch() {
        let h = harness(None, vec![], None);
        let body = h.relay.respond(VIEWED).await;
        assert_eq!(body, StatusBody::new(500, "could not get recommendation for this user"));
        assert_eq!(h.recommender.calls.load(Ordering::SeqCst), 1);
        assert!(h.destination.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_destination_failure_hides_status() {
        let h = harness(None, one_rec(), Some(503));
        let body = h.relay.respond(VIEWED).await;
        assert_eq!(body.status, 500);
        assert_eq!(body.message, "could not send webhook");
        assert!(!body.message.contains("503"));
    }
}
