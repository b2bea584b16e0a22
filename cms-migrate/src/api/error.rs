//! Errors raised while talking to the Manage API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured `error` payload returned by a single query or mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = self.message.as_deref().unwrap_or("no message");
        match &self.code {
            Some(code) => write!(f, "{} ({})", message, code)?,
            None => write!(f, "{}", message)?,
        }
        if let Some(data) = self.data.as_ref().filter(|d| !d.is_null()) {
            write!(f, " {}", data)?;
        }
        Ok(())
    }
}

/// Failure of a single API request
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network, HTTP status or authentication failure
    Transport {
        message: String,
        status: Option<u16>,
    },
    /// Top-level GraphQL `errors` array (validation, unknown types, ...)
    Graphql { messages: Vec<String> },
    /// The operation answered with its own `error` payload
    Remote(RemoteError),
    /// Response did not have the expected shape
    MalformedResponse { message: String },
}

impl ApiError {
    pub fn transport(message: impl Into<String>, status: Option<u16>) -> Self {
        ApiError::Transport {
            message: message.into(),
            status,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ApiError::MalformedResponse {
            message: message.into(),
        }
    }

    /// Whether the failure happened before the service could answer the operation
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport {
                message,
                status: Some(status),
            } => write!(f, "Transport error (HTTP {}): {}", status, message),
            ApiError::Transport { message, .. } => write!(f, "Transport error: {}", message),
            ApiError::Graphql { messages } => {
                write!(f, "GraphQL error: {}", messages.join("; "))
            }
            ApiError::Remote(error) => write!(f, "Remote error: {}", error),
            ApiError::MalformedResponse { message } => {
                write!(f, "Malformed response: {}", message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        let status = error.status().map(|s| s.as_u16());
        ApiError::Transport {
            message: error.to_string(),
            status,
        }
    }
}
