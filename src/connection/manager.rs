//! Connection manager implementation
//!
//! Owns the HTTP client bound to the Strapi server and tracks whether the
//! server answered the last liveness probe.

use super::types::{CheckResult, ConnectionState};
use crate::config::StrapiConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use reqwest::StatusCode;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use url::Url;

/// Base URL, credential and connection state for one Strapi server
#[derive(Debug)]
pub struct ConnectionManager {
    /// Client with base URL and bearer token applied
    client: HttpClient,
    /// Server root, the target of the liveness probe
    base_url: Url,
    /// Registered collection names
    collections: Vec<String>,
    /// Held for the whole probe so concurrent callers never race on it
    state: Mutex<ConnectionState>,
}

impl ConnectionManager {
    /// Create a manager from validated configuration
    ///
    /// No request is made until [`connect`](Self::connect) or
    /// [`check_connection`](Self::check_connection) is called.
    pub fn new(config: &StrapiConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut http_config = HttpClientConfig::builder()
            .base_url(base_url.as_str())
            .header("Accept", "application/json");
        if let Some(timeout) = config.timeout() {
            http_config = http_config.timeout(timeout);
        }
        let client = HttpClient::with_bearer(http_config.build(), config.api_token.clone())?;

        Ok(Self {
            client,
            base_url,
            collections: config.plural_api_ids.clone(),
            state: Mutex::new(ConnectionState::default()),
        })
    }

    /// HTTP client used for data calls
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Server root URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Registered collection names
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    /// Whether the last probe succeeded
    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.is_connected
    }

    /// Outcome of the last probe, if any
    pub async fn last_probe(&self) -> Option<CheckResult> {
        self.state.lock().await.last_probe.clone()
    }

    /// Establish the connection, reusing a previous success
    ///
    /// Once a probe has succeeded, later calls return the cached result
    /// without touching the network.
    pub async fn connect(&self) -> CheckResult {
        let mut state = self.state.lock().await;

        if state.is_connected {
            if let Some(ref cached) = state.last_probe {
                debug!("Reusing established connection to {}", self.base_url);
                return cached.clone();
            }
        }

        let result = self.probe().await;
        if result.success {
            info!("Connected to Strapi API at {}", self.base_url);
        }
        record(&mut state, &result);
        result
    }

    /// Probe the server now, ignoring any cached success
    pub async fn check_connection(&self) -> CheckResult {
        let mut state = self.state.lock().await;

        let result = self.probe().await;
        if let Some(ref message) = result.message {
            error!("{message}");
        }
        record(&mut state, &result);
        result
    }

    /// GET the server root with the credential; only `200` counts as live
    async fn probe(&self) -> CheckResult {
        debug!("Probing Strapi API at {}", self.base_url);

        let response = match self.client.get(self.base_url.as_str()).await {
            Ok(response) => response,
            Err(e) => return CheckResult::failure(format!("Error connecting to Strapi API: {e}")),
        };

        let status = response.status();
        if status == StatusCode::OK {
            return CheckResult::success();
        }

        let body = response.text().await.unwrap_or_default();
        CheckResult::failure(format!(
            "Error connecting to Strapi API: {} - {body}",
            status.as_u16()
        ))
    }
}

fn record(state: &mut ConnectionState, result: &CheckResult) {
    state.is_connected = result.success;
    state.last_probe = Some(result.clone());
}
