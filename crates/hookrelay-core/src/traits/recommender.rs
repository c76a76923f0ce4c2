//! Recommendation service trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Recommendation;

/// A content recommendation service keyed by a user identity field.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Service name, used in logs.
    fn name(&self) -> &str;

    /// Recommendations for the user whose `field` equals `value`, best first.
    /// An empty list is a valid answer at this level.
    async fn recommend(&self, field: &str, value: &str) -> Result<Vec<Recommendation>>;
}
