//! Error types for the Apollo Portal client.
//!
//! # Design
//! Three layers mirror the call path. `HttpError` is a non-2xx response with
//! its raw status and body. `TransportError` is anything that went wrong
//! while executing a request, including an `HttpError`. `ApolloError` is what
//! every `ConfigService` operation returns: it names the operation and the
//! key or namespace involved and keeps the underlying failure reachable via
//! `source()`.

use std::fmt;

use thiserror::Error;

/// The server answered with a status outside 200..300.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status}: {body}")]
pub struct HttpError {
    pub status: u16,
    pub body: String,
}

/// Failure while executing a single request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A response arrived with a non-success status.
    #[error("server rejected request with status {}", .0.status)]
    Status(#[from] HttpError),

    /// No usable response was received (connect, DNS, TLS, body read).
    #[error("request failed: {0}")]
    Io(#[from] ureq::Error),
}

impl TransportError {
    pub fn http_error(&self) -> Option<&HttpError> {
        match self {
            TransportError::Status(err) => Some(err),
            TransportError::Io(_) => None,
        }
    }
}

/// The facade operation an `ApolloError` originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateOrUpdateItem,
    PublishNamespace,
    GetItem,
    DeleteItem,
    ListNamespaceItems,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::CreateOrUpdateItem => "create or update item",
            Operation::PublishNamespace => "publish namespace",
            Operation::GetItem => "get item",
            Operation::DeleteItem => "delete item",
            Operation::ListNamespaceItems => "list namespace items",
        };
        f.write_str(name)
    }
}

/// What went wrong inside a facade operation.
#[derive(Debug, Error)]
pub enum ApolloErrorKind {
    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode response body")]
    Decode(#[source] serde_json::Error),

    #[error("request failed")]
    Transport(#[from] TransportError),
}

/// Domain error returned by every `ConfigService` operation.
///
/// `target` is the item key for item operations and the namespace name for
/// namespace-wide ones.
#[derive(Debug, Error)]
#[error("failed to {operation}: {target}")]
pub struct ApolloError {
    pub operation: Operation,
    pub target: String,
    #[source]
    pub kind: ApolloErrorKind,
}

impl ApolloError {
    pub(crate) fn new(operation: Operation, target: &str, kind: impl Into<ApolloErrorKind>) -> Self {
        Self {
            operation,
            target: target.to_string(),
            kind: kind.into(),
        }
    }

    /// The non-2xx response behind this error, if that is what caused it.
    pub fn http_error(&self) -> Option<&HttpError> {
        match &self.kind {
            ApolloErrorKind::Transport(err) => err.http_error(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.http_error().map(|err| err.status)
    }
}

/// Invalid or missing client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("base URL must start with http:// or https://: {0}")]
    InvalidBaseUrl(String),
}
