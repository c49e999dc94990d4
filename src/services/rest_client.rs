//! Upstream REST client.
//!
//! Shared HTTP plumbing for the Jira and Stash APIs: base URL handling,
//! Basic authentication and mapping of non-2xx responses to [`AppError`].

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Which upstream a client talks to. Used for error classification and log
/// prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Jira,
    Stash,
}

impl Upstream {
    fn label(self) -> &'static str {
        match self {
            Self::Jira => "jira",
            Self::Stash => "stash",
        }
    }

    fn error(self, message: impl Into<String>, status_code: u16, endpoint: &str) -> AppError {
        match self {
            Self::Jira => AppError::issue_tracker(message, status_code, endpoint),
            Self::Stash => AppError::source_control(message, status_code, endpoint),
        }
    }
}

/// REST client configuration.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Base URL every endpoint is appended to.
    pub base_url: String,

    /// Basic-auth user.
    pub username: String,

    /// Basic-auth password.
    pub password: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Description of one outbound GET: endpoint path plus query parameters.
///
/// Request builders produce these without touching the network, so the
/// mapping from GraphQL arguments to upstream URLs is testable on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub endpoint: String,
    pub query: Vec<(String, String)>,
}

impl UpstreamRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter.
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present.
    pub fn param_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Look up the first value for a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Build the value of the `Authorization` header for Basic authentication.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}

/// HTTP client bound to one upstream.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    config: RestClientConfig,
    upstream: Upstream,
}

impl RestClient {
    /// Create a new client. Credentials are baked into the default headers.
    pub fn new(upstream: Upstream, config: RestClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        let mut auth_value =
            header::HeaderValue::from_str(&basic_auth_header(&config.username, &config.password))
                .map_err(|_| AppError::authentication("Invalid credential format"))?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            upstream,
        })
    }

    /// Full URL for an endpoint.
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Issue a GET for `request` and deserialize the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, request: &UpstreamRequest) -> Result<T, AppError> {
        let url = self.api_url(&request.endpoint);
        log::debug!("[{}] GET {}", self.upstream.label(), request.endpoint);

        let mut builder = self.client.get(&url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let result = match builder.send().await {
            Ok(response) => self.handle_response(response, &request.endpoint).await,
            Err(e) => Err(AppError::from(e)),
        };

        if let Err(e) = &result {
            log::warn!(
                "[{}] GET {} failed: {}",
                self.upstream.label(),
                request.endpoint,
                e
            );
        }
        result
    }

    /// Handle API response errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| AppError::internal(format!("Failed to parse response: {}", e)));
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::authentication(format!(
                "{} rejected the configured credentials",
                self.upstream.label()
            )));
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = match (status, upstream_error_message(&body)) {
            (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
            (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
            (StatusCode::TOO_MANY_REQUESTS, _) => "Rate limit exceeded".to_string(),
            (_, Some(msg)) => msg,
            _ => format!("Request failed ({})", status_code),
        };

        Err(self.upstream.error(message, status_code, endpoint))
    }
}

/// Pull a human-readable message out of an upstream error body.
///
/// Jira answers `{"errorMessages": ["..."], "errors": {...}}`; Stash answers
/// `{"errors": [{"message": "..."}]}`.
fn upstream_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;

    let jira = value
        .get("errorMessages")
        .and_then(|m| m.as_array())
        .and_then(|m| m.first())
        .and_then(|m| m.as_str());

    let stash = value
        .get("errors")
        .and_then(|e| e.as_array())
        .and_then(|e| e.first())
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str());

    jira.or(stash).map(str::to_owned)
}
