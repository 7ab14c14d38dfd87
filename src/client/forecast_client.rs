//! Async client for the forecast API.

use crate::client::error::ClientError;
use crate::client::request::{DateWindow, ForecastRequest};
use crate::types::payload::ForecastPayload;
use log::{info, warn};
use reqwest::Client;

/// Downloads forecast payloads.
///
/// # Examples
///
/// ```no_run
/// use forecast_etl::{DateWindow, ForecastClient, ForecastRequest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = ForecastRequest::default();
/// let window = DateWindow::default_from(request.today()?);
///
/// let payload = ForecastClient::new().fetch(&request, &window).await?;
/// println!("{} days in {}", payload.days_count(), payload.timezone);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ForecastClient {
    http: Client,
}

impl ForecastClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an existing `reqwest` client (connection pool, proxy, timeouts).
    pub fn with_http_client(http: Client) -> Self {
        Self { http }
    }

    /// Fetches and validates the forecast for `window`.
    ///
    /// # Errors
    ///
    /// * [`ClientError::NetworkRequest`] if the request can't be sent.
    /// * [`ClientError::HttpStatus`] for a non-success status.
    /// * [`ClientError::Decode`] if the body is not a forecast payload.
    /// * [`ClientError::InvalidPayload`] if the payload fails [`ForecastPayload::validate`].
    pub async fn fetch(
        &self,
        request: &ForecastRequest,
        window: &DateWindow,
    ) -> Result<ForecastPayload, ClientError> {
        let url = request.url(window);
        info!(
            "Requesting forecast {} .. {} for ({}, {})",
            window.start, window.end, request.latitude, request.longitude
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => ClientError::HttpStatus {
                        url,
                        status,
                        source: e,
                    },
                    None => ClientError::NetworkRequest(url, e),
                });
            }
        };

        let payload: ForecastPayload = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(url.clone(), e))?;
        payload.validate()?;

        info!("Received forecast for {} days", payload.days_count());
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_unreachable_host_is_a_network_error() {
        // Port 9 (discard) is closed on loopback, so the connection is refused.
        let request = ForecastRequest::builder()
            .base_url("http://127.0.0.1:9/v1/forecast".to_string())
            .build();
        let window = DateWindow::default_from(NaiveDate::from_ymd_opt(2025, 5, 5).unwrap());

        let err = ForecastClient::new()
            .fetch(&request, &window)
            .await
            .unwrap_err();
        match err {
            ClientError::NetworkRequest(url, _) => {
                assert!(url.starts_with("http://127.0.0.1:9/v1/forecast?"));
                assert!(url.ends_with("end_date=2025-05-11"));
            }
            other => panic!("Expected NetworkRequest, got {:?}", other),
        }
    }
}
