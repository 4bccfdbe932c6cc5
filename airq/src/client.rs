//! WAQI feed client.
//!
//! Issues a single `GET {base}/feed/geo:{lat};{lon}/?token=...` per lookup
//! and validates the response envelope:
//!
//! ```text
//! { "status": "ok", "data": { "aqi": 50, "city": { "name": ... },
//!   "dominentpol": "pm25", "time": { "iso": ... }, "iaqi": { "pm25": { "v": 42 }, ... } } }
//! ```
//!
//! There is no retry: one attempt per call, bounded by the configured timeout.

use std::net::{IpAddr, Ipv4Addr};

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

use crate::config::Config;
use crate::error::{AirQualityError, Result};

/// Some providers reject default library user agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const INVALID_STATUS: &str = "upstream API returned an invalid status";
const INCOMPLETE_DATA: &str = "upstream API returned incomplete data";
const COMMUNICATION_FAILED: &str = "error communicating with upstream API";
const INTERNAL_FAILURE: &str = "internal error processing data";

/// Top-level response of the feed endpoint.
///
/// On failure the provider sends `data` as a plain string, so it is kept
/// untyped until `status` has been checked.
#[derive(Debug, Deserialize)]
pub struct FeedEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Value,
}

/// The subset of the feed payload that is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedData {
    pub aqi: Number,
    pub city: City,
    pub dominentpol: String,
    pub time: FeedTime,
    /// Per-measurement readings keyed by code, in upstream order.
    pub iaqi: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct City {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedTime {
    pub iso: String,
}

impl FeedEnvelope {
    /// Check the envelope and extract the typed payload.
    ///
    /// # Errors
    ///
    /// [`AirQualityError::UpstreamProtocol`] when `status` is not `"ok"`,
    /// when `data` has no `iaqi`, or when any consumed field is missing or
    /// has the wrong type.
    pub fn into_data(self) -> Result<FeedData> {
        if self.status != "ok" {
            tracing::warn!(status = %self.status, "Upstream returned non-ok status");
            return Err(AirQualityError::upstream_protocol(INVALID_STATUS));
        }

        let has_iaqi = self.data.get("iaqi").is_some_and(|v| !v.is_null());
        if !has_iaqi {
            tracing::warn!("Upstream payload has no iaqi field");
            return Err(AirQualityError::upstream_protocol(INCOMPLETE_DATA));
        }

        serde_json::from_value(self.data).map_err(|e| {
            tracing::warn!(error = %e, "Upstream payload does not match feed shape");
            AirQualityError::upstream_protocol(INCOMPLETE_DATA)
        })
    }
}

/// HTTP client for the WAQI feed API.
#[derive(Debug, Clone)]
pub struct AqicnClient {
    http: Client,
    base_url: String,
    token: String,
}

impl AqicnClient {
    /// Create a client from configuration.
    ///
    /// Connections are made over IPv4 only and are not kept alive between
    /// calls.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build HTTP client");
                AirQualityError::internal(INTERNAL_FAILURE)
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Feed URL for a coordinate, without the token.
    pub fn feed_url(&self, lat: f64, lon: f64) -> String {
        format!("{}/feed/geo:{};{}/", self.base_url, lat, lon)
    }

    /// Fetch the current feed for a coordinate.
    ///
    /// # Errors
    ///
    /// - [`AirQualityError::UpstreamTimeout`] if no response arrives in time
    /// - [`AirQualityError::UpstreamUnavailable`] if no response is received
    /// - [`AirQualityError::UpstreamProtocol`] for non-2xx responses and bad payloads
    /// - [`AirQualityError::Internal`] for anything else
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<FeedData> {
        let url = self.feed_url(lat, lon);
        tracing::debug!(url = %url, "Fetching upstream feed");

        let envelope: FeedEnvelope = self
            .http
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| classify(&e))?
            .json()
            .await
            .map_err(|e| classify(&e))?;

        tracing::debug!(status = %envelope.status, data = %envelope.data, "Upstream payload");

        envelope.into_data()
    }
}

/// Map a transport error onto the error taxonomy.
fn classify(e: &reqwest::Error) -> AirQualityError {
    let err = if e.is_timeout() {
        AirQualityError::UpstreamTimeout
    } else if e.is_connect() || e.is_request() {
        AirQualityError::UpstreamUnavailable
    } else if e.is_status() || e.is_body() || e.is_decode() || e.is_redirect() {
        AirQualityError::upstream_protocol(COMMUNICATION_FAILED)
    } else {
        AirQualityError::internal(INTERNAL_FAILURE)
    };

    tracing::warn!(error = %e, status = ?e.status(), kind = ?err.kind(), "Upstream request failed");
    err
}
