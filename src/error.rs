//! Application error types.
//!
//! Every failure a resolver can hit is an [`AppError`]. Resolvers hand it to
//! GraphQL through [`ErrorExtensions`], so the failing field resolves to null
//! and the error shows up in the response's `errors` list with a stable
//! `code` extension.

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Application-level errors surfaced by resolvers and the HTTP shell.
#[derive(Debug, Error)]
pub enum AppError {
    /// Jira API request failed.
    #[error("Jira API error: {message}")]
    IssueTracker {
        message: String,
        status_code: Option<u16>,
        endpoint: Option<String>,
    },

    /// Stash API request failed.
    #[error("Stash API error: {message}")]
    SourceControl {
        message: String,
        status_code: Option<u16>,
        endpoint: Option<String>,
    },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Upstream rejected the configured credentials.
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a Jira API error with status code and endpoint.
    pub fn issue_tracker(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::IssueTracker {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a Stash API error with status code and endpoint.
    pub fn source_control(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::SourceControl {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Machine-readable error code exposed in GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            Self::IssueTracker { .. } | Self::SourceControl { .. } => "UPSTREAM_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Authentication { .. } => "UNAUTHORIZED",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// HTTP status returned by the upstream, if the request got that far.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::IssueTracker { status_code, .. } | Self::SourceControl { status_code, .. } => {
                *status_code
            }
            _ => None,
        }
    }

    /// Upstream endpoint the error came from, if known.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::IssueTracker { endpoint, .. } | Self::SourceControl { endpoint, .. } => {
                endpoint.as_deref()
            }
            _ => None,
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", self.code());
            if let Some(status) = self.status_code() {
                ext.set("statusCode", i32::from(status));
            }
            if let Some(endpoint) = self.endpoint() {
                ext.set("endpoint", endpoint);
            }
        })
    }
}

// Conversions from common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network("Failed to connect to server")
        } else if err.is_builder() {
            Self::internal(format!("Invalid upstream request: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}
