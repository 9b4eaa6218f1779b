//! HTTP client for the Nominatim `reverse` endpoint.
//!
//! One GET per call with `lat`, `lon`, `zoom=18` and `format=jsonv2`. There is
//! no retry: a failed lookup is returned to the caller, which aborts the run
//! rather than importing a visit with a half-resolved place.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::cache::js_number;
use crate::error::GeocodeError;
use crate::types::GeocodeResult;

/// Building-level detail.
const ZOOM: &str = "18";
const FORMAT: &str = "jsonv2";

/// Client for a Nominatim-compatible reverse-geocoding service.
///
/// The endpoint comes from configuration: the public OpenStreetMap instance
/// by default, a self-hosted instance, or a mock server in tests.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
}

impl NominatimClient {
    /// Creates a client for the `reverse` endpoint at `base_url`.
    ///
    /// Nominatim's usage policy requires an identifying `User-Agent`; pass
    /// something that names this tool.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Looks up the place at `lat`, `lng`.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or timeout.
    /// - [`GeocodeError::UnexpectedStatus`] on any non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not a geocoding response.
    pub async fn reverse(&self, lat: f64, lng: f64) -> Result<GeocodeResult, GeocodeError> {
        let url = self.build_url(lat, lng);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let result: GeocodeResult =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("reverse(lat={lat}, lon={lng})"),
                source: e,
            })?;

        if let Some(message) = result.service_error() {
            tracing::warn!(lat, lng, error = message, "geocoding service returned no place");
        }

        Ok(result)
    }

    /// Builds the request URL with percent-encoded query parameters appended
    /// to any the base URL already carries.
    fn build_url(&self, lat: f64, lng: f64) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &js_number(lat))
            .append_pair("lon", &js_number(lng))
            .append_pair("zoom", ZOOM)
            .append_pair("format", FORMAT);
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
