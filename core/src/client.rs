//! Authenticated request helper for the Portal OpenAPI.
//!
//! # Design
//! `ApolloClient` owns an immutable `ClientConfig` and one long-lived
//! `Transport`. `build_request` turns `(method, path, body)` into an
//! `HttpRequest` without touching the network; `execute` sends it and maps
//! any non-2xx status to `HttpError`. Callers that do their own I/O can use
//! `build_request` alone and feed the response to `check_status`.

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{HttpError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Blocking client that authenticates every request with a bearer token.
#[derive(Debug, Clone)]
pub struct ApolloClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApolloClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> ApolloClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `path` is appended verbatim to the base URL and must already be
    /// encoded.
    pub fn build_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.config.token()),
        )];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }
        HttpRequest {
            method,
            url: format!("{}{path}", self.config.base_url()),
            headers,
            body,
        }
    }

    /// Send a prepared request. Returns the body of a 2xx response.
    pub fn execute(&self, request: &HttpRequest) -> Result<String, TransportError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request)?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        check_status(response).map_err(|err| {
            warn!(method = %request.method, url = %request.url, status = err.status, "request rejected");
            TransportError::from(err)
        })
    }

    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<String, TransportError> {
        self.execute(&self.build_request(method, path, body))
    }

    pub fn get(&self, path: &str) -> Result<String, TransportError> {
        self.request(HttpMethod::Get, path, None)
    }

    pub fn post(&self, path: &str, json_body: String) -> Result<String, TransportError> {
        self.request(HttpMethod::Post, path, Some(json_body))
    }

    pub fn put(&self, path: &str, json_body: String) -> Result<String, TransportError> {
        self.request(HttpMethod::Put, path, Some(json_body))
    }

    pub fn delete(&self, path: &str) -> Result<String, TransportError> {
        self.request(HttpMethod::Delete, path, None)
    }
}

/// Any 2xx yields the body; everything else becomes an `HttpError`.
pub fn check_status(response: HttpResponse) -> Result<String, HttpError> {
    if response.is_success() {
        return Ok(response.body);
    }
    Err(HttpError {
        status: response.status,
        body: response.body,
    })
}
