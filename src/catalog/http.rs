//! HTTP catalog source.
//!
//! Reads `GET <base>/skips/by-location?postcode=..&area=..` with a blocking
//! `reqwest` client. The body is validated in two steps: it must be a JSON
//! array, and every element must decode as a [`Skip`].

use crate::catalog::backend::CatalogSource;
use crate::domain::error::{Result, SkipHireError};
use crate::domain::{FetchError, LocationKey, Skip};
use std::time::Duration;

/// Catalog source backed by the remote skips endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpCatalog {
    /// Creates a source for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SkipHireError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("skiphire/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| SkipHireError::Config(format!("building HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The endpoint queried for `key`, without query parameters.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/skips/by-location", self.base_url)
    }
}

impl CatalogSource for HttpCatalog {
    fn fetch(&mut self, key: &LocationKey) -> std::result::Result<Vec<Skip>, FetchError> {
        let _span = tracing::debug_span!("http_fetch_skips", location = %key).entered();

        let response = self
            .client
            .get(self.endpoint())
            .header("Content-Type", "application/json")
            .query(&[("postcode", key.postcode()), ("area", key.area())])
            .send()
            .map_err(|e| FetchError::transport(e.status().map(|s| s.as_u16()), format!("Failed to fetch skips: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "catalog endpoint returned error status");
            return Err(FetchError::transport(
                Some(status.as_u16()),
                format!(
                    "Failed to fetch skips: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                )
                .trim_end()
                .to_string(),
            ));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::transport(Some(status.as_u16()), format!("reading response body: {e}")))?;

        let skips = parse_payload(&body)?;
        tracing::debug!(skip_count = skips.len(), "catalog payload decoded");
        Ok(skips)
    }
}

/// Decodes a catalog response body.
///
/// # Errors
///
/// Returns an `InvalidFormat` [`FetchError`] if the body is not JSON, is not
/// an array, or contains an element that is not a skip record.
pub fn parse_payload(body: &str) -> std::result::Result<Vec<Skip>, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FetchError::invalid_format(format!("Invalid response format: {e}")))?;

    if !value.is_array() {
        return Err(FetchError::invalid_format(
            "Invalid response format: expected array of skips",
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| FetchError::invalid_format(format!("Invalid skip record: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FetchErrorKind;

    #[test]
    fn parses_array_of_skips() {
        let body = r#"[
            {"id": 1, "size": 4, "hire_period_days": 7, "price_before_vat": 200, "vat": 20,
             "allowed_on_road": true, "allows_heavy_waste": false},
            {"id": 2, "size": 8, "hire_period_days": 14, "price_before_vat": 300, "vat": 20,
             "allowed_on_road": false, "allows_heavy_waste": true}
        ]"#;
        let skips = parse_payload(body).expect("valid payload");
        assert_eq!(skips.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn empty_array_is_a_valid_payload() {
        assert!(parse_payload("[]").expect("valid payload").is_empty());
    }

    #[test]
    fn non_array_payload_is_invalid_format() {
        let err = parse_payload(r#"{"skips": []}"#).unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::InvalidFormat);
        assert_eq!(err.message, "Invalid response format: expected array of skips");
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_elements_are_invalid_format() {
        let err = parse_payload(r#"[{"id": "x"}]"#).unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::InvalidFormat);
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let source = HttpCatalog::new("https://example.test/api/", 1_000).expect("client");
        assert_eq!(source.endpoint(), "https://example.test/api/skips/by-location");
    }
}
