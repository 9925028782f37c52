//! Client configuration

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, Result};

/// Timeout applied when the configuration does not set one
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connection settings for a [`GroupSessionClient`](crate::GroupSessionClient)
///
/// # Example
/// ```
/// use groupsession_client::ClientConfig;
///
/// let config = ClientConfig::new("http://localhost:8080/gsession")
///     .with_timeout_ms(5_000)
///     .with_header("User-Agent", "GroupSession-Example/1.0");
/// assert_eq!(config.timeout().as_millis(), 5_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:8080/gsession`
    pub base_url: String,
    /// Client-wide request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Extra headers, applied over the JSON defaults
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: None,
            headers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Effective request timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    /// Parse and check the base URL
    ///
    /// # Errors
    /// Returns an error if the URL does not parse or cannot carry a path.
    pub fn parse_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfig(format!(
                "base URL cannot carry a path: {}",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Default headers sent with every request
    ///
    /// `Content-Type` and `Accept` are `application/json` unless a configured
    /// header of the same name replaces them.
    ///
    /// # Errors
    /// Returns an error if a configured header name or value is not valid HTTP.
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new("http://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
    }

    #[test]
    fn test_default_headers() {
        let headers = ClientConfig::new("http://localhost:8080")
            .header_map()
            .unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT], "application/json");
    }

    #[test]
    fn test_custom_headers_merge_over_defaults() {
        let headers = ClientConfig::new("http://localhost:8080")
            .with_header("User-Agent", "GroupSession-Example/1.0")
            .with_header("accept", "application/vnd.gs+json")
            .header_map()
            .unwrap();

        assert_eq!(headers["user-agent"], "GroupSession-Example/1.0");
        assert_eq!(headers[ACCEPT], "application/vnd.gs+json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_invalid_header_name() {
        let result = ClientConfig::new("http://localhost:8080")
            .with_header("bad header", "x")
            .header_map();
        assert!(matches!(result, Err(ClientError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ClientConfig::new("not a url").parse_base_url().is_err());
        assert!(matches!(
            ClientConfig::new("mailto:admin@example.com").parse_base_url(),
            Err(ClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            base_url = "http://localhost:8080/gsession"
            timeout_ms = 5000

            [headers]
            User-Agent = "GroupSession-Example/1.0"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeout_ms, Some(5000));
        assert_eq!(
            config.headers.get("User-Agent").map(String::as_str),
            Some("GroupSession-Example/1.0")
        );
    }
}
