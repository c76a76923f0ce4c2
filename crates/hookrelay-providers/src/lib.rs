//! # HookRelay Providers
//! Recommendation service clients and the adapter the pipeline calls.

pub mod lytics;

use hookrelay_core::config::RecommendationConfig;
use hookrelay_core::error::{RelayError, Result};
use hookrelay_core::traits::RecommendationSource;
use hookrelay_core::types::Recommendation;

pub use lytics::LyticsClient;

/// Identity field recommendations are looked up by.
pub const EMAIL_FIELD: &str = "email";

/// Create the recommendation source from configuration, sharing `client`.
pub fn create_recommender(
    config: &RecommendationConfig,
    client: reqwest::Client,
) -> Result<Box<dyn RecommendationSource>> {
    Ok(Box::new(LyticsClient::new(config, client)?))
}

/// Best recommendation for a user, keyed by email.
///
/// Any failure of the service and an empty result are both reported as
/// `RecommendationUnavailable`. Nothing is retried.
pub async fn fetch_top_recommendation(
    source: &dyn RecommendationSource,
    email: &str,
) -> Result<Recommendation> {
    let recs = source.recommend(EMAIL_FIELD, email).await.map_err(|e| match e {
        RelayError::RecommendationUnavailable(_) => e,
        other => RelayError::unavailable(format!("{}: {other}", source.name())),
    })?;

    tracing::debug!("{} returned {} recommendation(s)", source.name(), recs.len());
    recs.into_iter()
        .next()
        .ok_or_else(|| RelayError::unavailable(format!("{} returned no recommendations", source.name())))
}
