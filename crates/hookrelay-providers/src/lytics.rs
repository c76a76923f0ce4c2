//! Lytics content recommendation client.
//!
//! `GET {base}/api/content/recommend/user/{field}/{value}?key=..&shuffle=false[&ql=..]`
//! answers with `{"status":200,"message":"success","data":[...]}`.

use async_trait::async_trait;
use hookrelay_core::config::RecommendationConfig;
use hookrelay_core::error::{RelayError, Result};
use hookrelay_core::traits::RecommendationSource;
use hookrelay_core::types::Recommendation;
use serde::Deserialize;
use url::Url;

pub struct LyticsClient {
    api_key: String,
    base_url: Url,
    filter: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Vec<Recommendation>,
}

impl LyticsClient {
    pub fn new(config: &RecommendationConfig, client: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RelayError::config(format!("recommendation.base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RelayError::config(format!(
                "recommendation.base_url is not a base url: {}",
                config.base_url
            )));
        }

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url,
            filter: config.filter.clone().filter(|f| !f.trim().is_empty()),
            client,
        })
    }

    fn recommend_url(&self, field: &str, value: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RelayError::config("recommendation.base_url is not a base url"))?
            .pop_if_empty()
            .extend(["api", "content", "recommend", "user", field, value]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("key", &self.api_key);
            query.append_pair("shuffle", "false");
            if let Some(ql) = &self.filter {
                query.append_pair("ql", ql);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl RecommendationSource for LyticsClient {
    fn name(&self) -> &str { "lytics" }

    async fn recommend(&self, field: &str, value: &str) -> Result<Vec<Recommendation>> {
        let url = self.recommend_url(field, value)?;

        let resp = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| RelayError::unavailable(format!("Lytics request failed: {}", e.without_url())))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!("Lytics API error {status}: {text}");
            return Err(RelayError::unavailable(format!("Lytics API error {status}")));
        }

        let envelope: Envelope = resp
            .json()
            .await
            .map_err(|e| RelayError::unavailable(format!("Lytics response: {}", e.without_url())))?;
        Ok(envelope.data)
    }
}
