use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::models::{ArrivalEstimate, Stop, Vehicle};

#[derive(Debug, Error)]
pub enum TransitError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("API error: {0}")]
    ApiError(String),
}

/// HTTP client for the transit backend consumed by the dashboard.
///
/// Owns transport detail only: URL construction, timeouts, status
/// checks, body decoding. What happens to a failure is the caller's
/// business.
pub struct TransitClient {
    client: Client,
    base_url: String,
}

impl TransitClient {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, TransitError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransitError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the current set of vehicle positions.
    pub async fn get_vehicles(&self) -> Result<Vec<Vehicle>, TransitError> {
        self.get_json(self.vehicles_url()).await
    }

    /// Fetch upcoming arrivals for a stop, bounded to `limit` records.
    pub async fn get_arrivals(
        &self,
        stop_id: &str,
        limit: u32,
    ) -> Result<Vec<ArrivalEstimate>, TransitError> {
        self.get_json(self.arrivals_url(stop_id, limit)).await
    }

    /// Fetch metadata for a single stop.
    pub async fn get_stop(&self, stop_id: &str) -> Result<Stop, TransitError> {
        self.get_json(self.stop_url(stop_id)).await
    }

    fn vehicles_url(&self) -> String {
        format!("{}/vehicles", self.base_url)
    }

    fn arrivals_url(&self, stop_id: &str, limit: u32) -> String {
        format!(
            "{}/stops/{}/arrivals?limit={}",
            self.base_url,
            urlencoding::encode(stop_id),
            limit
        )
    }

    fn stop_url(&self, stop_id: &str) -> String {
        format!("{}/stops/{}", self.base_url, urlencoding::encode(stop_id))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, TransitError> {
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransitError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                url = %url,
                status = status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Request returned non-success status"
            );
            return Err(TransitError::ApiError(format!("HTTP error: {}", status.as_u16())));
        }

        // Read the body first so parse failures can be logged with context
        let body = response
            .text()
            .await
            .map_err(|e| TransitError::NetworkError(e.to_string()))?;

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            response_size = body.len(),
            "Request completed"
        );

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                url = %url,
                error = %e,
                "Failed to parse response body: {}",
                &body[..body.len().min(500)]
            );
            TransitError::ParseError(e.to_string())
        })
    }
}
