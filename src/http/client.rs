//! HTTP client for the Strapi REST API
//!
//! A thin wrapper over `reqwest` that:
//! - Resolves request paths against a base URL
//! - Attaches default headers and the bearer credential to every request
//! - Leaves status interpretation to the caller
//!
//! Requests are sent exactly once. There is no retry or rate limiting.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Method, QueryParams};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout (none unless configured)
    pub timeout: Option<Duration>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: None,
            default_headers: HashMap::new(),
            user_agent: format!("strapi-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, sent in order
    pub query: QueryParams,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a list of query parameters
    #[must_use]
    pub fn query_params(mut self, params: &[(String, String)]) -> Self {
        self.query.extend_from_slice(params);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client bound to one server and one credential
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    bearer_token: Option<String>,
}

impl HttpClient {
    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            bearer_token: None,
        })
    }

    /// Create a client that sends `Authorization: Bearer <token>`
    pub fn with_bearer(config: HttpClientConfig, token: impl Into<String>) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.bearer_token = Some(token.into());
        Ok(client)
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> Option<&str> {
        self.config.base_url.as_deref()
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a request and return the raw response, whatever its status
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(url);
        let mut req = self.client.request(method.into(), &full_url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref token) = self.bearer_token {
            req = req.bearer_auth(token);
        }

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        if let Some(ref body) = config.body {
            req = req.json(body);
        }

        debug!("{} {} ({} params)", method, full_url, config.query.len());
        let response = req.send().await.map_err(Error::Http)?;
        debug!("{} {} -> {}", method, full_url, response.status().as_u16());

        Ok(response)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_bearer_token", &self.bearer_token.is_some())
            .finish_non_exhaustive()
    }
}
