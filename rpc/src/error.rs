use thiserror::Error;

use crate::config::ConfigError;

/// Failures of the transport that carries request and response text.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer whose body is not a JSON-RPC error envelope.
    #[error("node answered with HTTP status {status}")]
    Status { status: u16, body: String },

    /// For custom [`crate::Transport`] implementations that cannot reach
    /// the node, e.g. a closed channel or a missing connection.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by [`crate::PhantasmaClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be delivered or the response not received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The node rejected the call.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response did not have the shape declared for the method.
    #[error("failed to decode {method} response as {expected}: {source}")]
    Decode {
        method: String,
        expected: String,
        source: serde_json::Error,
    },

    #[error("invalid arguments for {method}: {reason}")]
    InvalidArguments { method: String, reason: String },

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("failed to encode request: {0}")]
    Encode(serde_json::Error),

    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub(crate) fn decode(
        method: impl Into<String>,
        expected: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        ClientError::Decode {
            method: method.into(),
            expected: expected.into(),
            source,
        }
    }

    /// Whether the node itself answered with an error envelope.
    pub fn is_rpc(&self) -> bool {
        matches!(self, ClientError::Rpc { .. })
    }
}
