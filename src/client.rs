// HTTP client for the remote reservation search service. One request per
// search, no retries; every transport-level problem collapses into a
// single error class with an optional service-supplied message.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::criteria::SearchCriteria;
use crate::offer::SearchEnvelope;

/// Environment override for the service base address.
pub const BASE_URL_ENV: &str = "BOOKING_API_BASE_URL";

/// Local development address used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Shown when the transport failed and the service supplied no message.
pub const FALLBACK_TRANSPORT_MESSAGE: &str =
    "Failed to fetch available rooms. Please try again.";

#[derive(Error, Debug)]
pub enum ClientError {
    /// Network failure, timeout, non-2xx status, or a malformed body.
    /// Causes are deliberately not distinguished; the optional message is
    /// whatever the service put in an error response body.
    #[error("{}", .message.as_deref().unwrap_or(FALLBACK_TRANSPORT_MESSAGE))]
    Transport { message: Option<String> },

    #[error("failed to initialize HTTP client: {0}")]
    Init(reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Reads the base address from `BOOKING_API_BASE_URL`, falling back to
    /// the local development default.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            ..Self::default()
        }
    }
}

/// Seam between the result-state machine and the wire. The session only
/// ever sees this trait, so tests can script responses without a server.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchEnvelope, ClientError>;
}

/// Real backend: `POST {base_url}/api/booking/search`.
pub struct AvailabilityClient {
    config: ClientConfig,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequestBody {
    check_in: chrono::NaiveDate,
    check_out: chrono::NaiveDate,
    rooms: u32,
    adults: u32,
    children: u32,
}

impl AvailabilityClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Init)?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/api/booking/search",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl SearchBackend for AvailabilityClient {
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchEnvelope, ClientError> {
        let body = SearchRequestBody {
            check_in: criteria.check_in(),
            check_out: criteria.check_out(),
            rooms: criteria.rooms(),
            adults: criteria.adults(),
            children: criteria.children(),
        };

        debug!(
            check_in = %body.check_in,
            check_out = %body.check_out,
            rooms = body.rooms,
            "requesting availability"
        );

        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "availability request failed");
                ClientError::Transport { message: None }
            })?;

        let status = response.status();
        if !status.is_success() {
            // An error response body may still carry a service message.
            let message = response
                .json::<SearchEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.message);
            warn!(%status, "availability request rejected");
            return Err(ClientError::Transport { message });
        }

        response.json::<SearchEnvelope>().await.map_err(|err| {
            error!(error = %err, "malformed availability response");
            ClientError::Transport { message: None }
        })
    }
}
