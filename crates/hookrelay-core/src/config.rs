//! Process-wide relay configuration.
//!
//! Loaded once at startup from `~/.hookrelay/config.toml` (or `--config`),
//! then shared read-only behind an `Arc` for the life of the process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

pub const ENV_RECOMMENDATION_KEY: &str = "HOOKRELAY_RECOMMENDATION_KEY";
pub const ENV_DESTINATION: &str = "HOOKRELAY_DESTINATION";
pub const ENV_DESTINATION_KEY: &str = "HOOKRELAY_DESTINATION_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Compute an optimal send hour and attach it to outbound payloads.
    #[serde(default)]
    pub optimal_hour: bool,
    /// Key into `destinations` naming the active destination.
    #[serde(default = "default_destination")]
    pub destination: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterRule>,
    #[serde(default)]
    pub destinations: BTreeMap<String, DestinationEndpoint>,
}

/// Which events get processed. Unset or empty fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

impl FilterRule {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.name().is_none() && self.segment().is_none()
    }
}

/// One outbound destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationEndpoint {
    pub url: String,
    /// Sent verbatim as the `Authorization` header.
    #[serde(default)]
    pub api_key: String,
    /// Template identifier in the destination's rendering system.
    #[serde(default)]
    pub template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_recommendation_url")]
    pub base_url: String,
    /// Content filter expression applied to recommendations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_recommendation_url(),
            filter: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Shared HTTP client settings. Without a timeout the transport defaults apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_destination() -> String { "sparkpost".into() }
fn default_recommendation_url() -> String { "https://api.lytics.io".into() }
fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8080 }

impl Default for RelayConfig {
    fn default() -> Self {
        let mut destinations = BTreeMap::new();
        destinations.insert(
            default_destination(),
            DestinationEndpoint {
                url: "https://api.sparkpost.com/api/v1/transmissions".into(),
                api_key: String::new(),
                template: String::new(),
            },
        );
        Self {
            optimal_hour: false,
            destination: default_destination(),
            server: ServerConfig::default(),
            http: HttpConfig::default(),
            recommendation: RecommendationConfig::default(),
            filter: None,
            destinations,
        }
    }
}

impl RelayConfig {
    /// `~/.hookrelay`
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hookrelay")
    }

    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Expand `~` and environment variables in a user-supplied path.
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::full(path).map(|p| p.into_owned()).unwrap_or_else(|_| path.into()))
    }

    /// Load from the default path, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            let mut config = Self::default();
            config.apply_env_overrides(|key| std::env::var(key).ok());
            Ok(config)
        }
    }

    /// Load from an explicit path. A missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RelayError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RelayError::config(format!("invalid config: {e}")))
    }

    /// Secrets and the destination choice may come from the environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_RECOMMENDATION_KEY).filter(|v| !v.is_empty()) {
            self.recommendation.api_key = key;
        }
        if let Some(dest) = lookup(ENV_DESTINATION).filter(|v| !v.is_empty()) {
            self.destination = dest;
        }
        if let Some(key) = lookup(ENV_DESTINATION_KEY).filter(|v| !v.is_empty()) {
            if let Some(endpoint) = self.destinations.get_mut(&self.destination) {
                endpoint.api_key = key;
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| RelayError::config(format!("serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The active destination endpoint.
    pub fn selected_destination(&self) -> Result<&DestinationEndpoint> {
        self.destinations.get(&self.destination).ok_or_else(|| {
            RelayError::config(format!("destination '{}' is not configured", self.destination))
        })
    }

    /// Startup check. The server refuses to start on an unusable config.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.selected_destination()?;
        if endpoint.url.trim().is_empty() {
            return Err(RelayError::config(format!(
                "destination '{}' has no url",
                self.destination
            )));
        }
        if self.recommendation.base_url.trim().is_empty() {
            return Err(RelayError::config("recommendation.base_url is empty"));
        }
        if self.recommendation.api_key.is_empty() {
            tracing::warn!("recommendation.api_key is empty; lookups will likely be rejected");
        }
        Ok(())
    }

    /// Copy with every credential replaced, for display.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        copy.recommendation.api_key = mask_secret(&copy.recommendation.api_key);
        for endpoint in copy.destinations.values_mut() {
            endpoint.api_key = mask_secret(&endpoint.api_key);
        }
        copy
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
optimal_hour = true
destination = "sparkpost"

[server]
port = 9090

[recommendation]
api_key = "lytics-secret"
filter = 'FILTER AND(url LIKE "www.example.com/*") FROM content'

[filter]
name = "viewed"
segment = ""

[destinations.sparkpost]
url = "https://api.sparkpost.com/api/v1/transmissions"
api_key = "sp-secret"
template = "weekly-digest"
"#;

    #[test]
    fn test_parse_sample() {
        let config = RelayConfig::parse(SAMPLE).unwrap();
        assert!(config.optimal_hour);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.recommendation.base_url, "https://api.lytics.io");
        assert!(config.recommendation.filter.as_deref().unwrap().starts_with("FILTER"));

        let filter = config.filter.as_ref().unwrap();
        assert_eq!(filter.name(), Some("viewed"));
        assert_eq!(filter.segment(), None);

        let dest = config.selected_destination().unwrap();
        assert_eq!(dest.template, "weekly-digest");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_destination_fails_validation() {
        let mut config = RelayConfig::parse(SAMPLE).unwrap();
        config.destination = "mailchimp".into();
        assert!(matches!(config.validate(), Err(RelayError::Config(_))));
    }

    #[test]
    fn test_empty_url_fails_validation() {
        let config = RelayConfig::default();
        assert!(config.validate().is_ok());

        let mut config = RelayConfig::default();
        config.destinations.get_mut("sparkpost").unwrap().url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(RelayConfig::parse("optimal_hour = maybe"), Err(RelayError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RelayConfig::parse(SAMPLE).unwrap();
        config.apply_env_overrides(|key| match key {
            ENV_RECOMMENDATION_KEY => Some("from-env".into()),
            ENV_DESTINATION_KEY => Some("sp-env".into()),
            _ => None,
        });
        assert_eq!(config.recommendation.api_key, "from-env");
        assert_eq!(config.selected_destination().unwrap().api_key, "sp-env");
        assert_eq!(config.destination, "sparkpost");
    }

    #[test]
    fn test_filter_rule_empty() {
        assert!(FilterRule::default().is_empty());
        let rule = FilterRule { name: Some(String::new()), segment: Some("VIP".into()) };
        assert!(!rule.is_empty());
        assert_eq!(rule.name(), None);
    }

    #[test]
    fn test_masked_hides_secrets() {
        let config = RelayConfig::parse(SAMPLE).unwrap().masked();
        assert_eq!(config.recommendation.api_key, "lyti****");
        assert_eq!(config.selected_destination().unwrap().api_key, "sp-s****");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = RelayConfig::parse(SAMPLE).unwrap();
        config.save_to(&path).unwrap();

        let loaded = RelayConfig::load_from(&path).unwrap();
        assert_eq!(loaded.destination, "sparkpost");
        assert_eq!(loaded.filter, config.filter);
        assert_eq!(loaded.destinations, config.destinations);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RelayConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, RelayError::ConfigNotFound(_)));
    }
}
