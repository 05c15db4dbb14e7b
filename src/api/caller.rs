//! Strapi API caller
//!
//! Issues one HTTP request per call and flattens the response envelope into
//! rows. Anything but `200` is an [`Error::Api`].

use crate::connection::ConnectionManager;
use crate::decode::{EnvelopeDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::output::RowSet;
use crate::types::{JsonValue, Method};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes REST calls against the server a [`ConnectionManager`] points at
#[derive(Debug, Clone)]
pub struct ApiCaller {
    connection: Arc<ConnectionManager>,
    decoder: EnvelopeDecoder,
}

impl ApiCaller {
    /// Create a caller sharing the given connection
    pub fn new(connection: Arc<ConnectionManager>) -> Self {
        Self {
            connection,
            decoder: EnvelopeDecoder::new(),
        }
    }

    /// The shared connection
    pub fn connection(&self) -> &Arc<ConnectionManager> {
        &self.connection
    }

    /// Call `path` with `method` and return the flattened rows
    ///
    /// Query parameters are passed through verbatim. GET requests never carry
    /// a body; for the other verbs `body` is sent as JSON when present.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: Option<&JsonValue>,
    ) -> Result<RowSet> {
        let mut request = RequestConfig::new()
            .header("Content-Type", "application/json")
            .query_params(params);

        if method.sends_body() {
            if let Some(body) = body {
                request = request.json(body.clone());
            }
        }

        let response = self
            .connection
            .client()
            .request(method, path, request)
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            warn!("{} {} failed with {}", method, path, status.as_u16());
            return Err(Error::api(status.as_u16(), text));
        }

        let rows = self.decoder.decode(&text)?;
        debug!("{} {} returned {} rows", method, path, rows.len());
        Ok(rows)
    }

    /// Like [`execute`](Self::execute), with the verb given as text
    ///
    /// Verbs other than GET, POST, PUT and DELETE are rejected before any
    /// request is made.
    pub async fn execute_raw(
        &self,
        method: &str,
        path: &str,
        params: &[(String, String)],
        body: Option<&JsonValue>,
    ) -> Result<RowSet> {
        let method: Method = method.parse()?;
        self.execute(method, path, params, body).await
    }
}
