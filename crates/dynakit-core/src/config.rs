//! Client configuration.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_REGION: &str = "us-east-1";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Region name, used to derive the endpoint.
    pub region: String,
    /// Explicit endpoint (e.g. `http://localhost:8000/`), overrides the region.
    pub endpoint: Option<String>,
    /// Default delay between pages of a count, in milliseconds.
    pub count_delay_ms: u64,
    /// Fallback log filter directive for hosts that install a subscriber
    /// without `RUST_LOG`.
    pub log_level: String,
}

impl ClientConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            region: lookup("DYNAKIT_REGION")
                .or_else(|| lookup("AWS_REGION"))
                .unwrap_or(defaults.region),
            endpoint: lookup("DYNAKIT_ENDPOINT").filter(|e| !e.is_empty()),
            count_delay_ms: lookup("DYNAKIT_COUNT_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.count_delay_ms),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set an explicit endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the default count delay.
    #[must_use]
    pub fn with_count_delay(mut self, delay: Duration) -> Self {
        self.count_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// The URL requests should go to.
    ///
    /// An explicit endpoint wins. A region value containing `/` is taken as a
    /// URL as well; any other region name maps to the public endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        if let Some(endpoint) = &self.endpoint {
            return endpoint.clone();
        }
        if self.region.contains('/') {
            return self.region.clone();
        }
        format!("https://dynamodb.{}.amazonaws.com/", self.region)
    }

    /// Default delay between pages of a count.
    #[must_use]
    pub fn count_delay(&self) -> Duration {
        Duration::from_millis(self.count_delay_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_owned(),
            endpoint: None,
            count_delay_ms: 0,
            log_level: "info".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_should_use_defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.endpoint(), "https://dynamodb.us-east-1.amazonaws.com/");
        assert_eq!(config.count_delay(), Duration::ZERO);
    }

    #[test]
    fn test_should_prefer_dynakit_region() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("AWS_REGION", "eu-west-1"),
            ("DYNAKIT_REGION", "ap-south-1"),
            ("DYNAKIT_COUNT_DELAY_MS", "250"),
        ]));
        assert_eq!(config.region, "ap-south-1");
        assert_eq!(config.count_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_should_fall_back_to_aws_region() {
        let config = ClientConfig::from_lookup(lookup(&[("AWS_REGION", "eu-west-1")]));
        assert_eq!(config.endpoint(), "https://dynamodb.eu-west-1.amazonaws.com/");
    }

    #[test]
    fn test_should_treat_region_with_slash_as_url() {
        let config = ClientConfig::default().with_region("http://localhost:8000/");
        assert_eq!(config.endpoint(), "http://localhost:8000/");
    }

    #[test]
    fn test_should_prefer_explicit_endpoint() {
        let config = ClientConfig::default()
            .with_region("eu-west-1")
            .with_endpoint("http://127.0.0.1:4566/");
        assert_eq!(config.endpoint(), "http://127.0.0.1:4566/");
    }

    #[test]
    fn test_should_read_log_level() {
        let config = ClientConfig::from_lookup(lookup(&[("LOG_LEVEL", "dynakit_core=debug")]));
        assert_eq!(config.log_level, "dynakit_core=debug");
    }

    #[test]
    fn test_should_ignore_unparseable_delay() {
        let config = ClientConfig::from_lookup(lookup(&[("DYNAKIT_COUNT_DELAY_MS", "soon")]));
        assert_eq!(config.count_delay_ms, 0);
    }

    #[test]
    fn test_should_deserialize_camel_case() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"region":"eu-central-1","countDelayMs":5}"#).unwrap();
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.count_delay_ms, 5);
        assert_eq!(config.log_level, "info");
    }
}
