//! Blocking client for the Apollo Portal OpenAPI.
//!
//! # Overview
//! Creates, updates, deletes, and reads config items and triggers namespace
//! releases. Every call is one or two synchronous HTTP round-trips; nothing is
//! cached and no state outlives a call.
//!
//! # Design
//! - `ApolloClient` is the transport layer: base URL, bearer token, and a
//!   pluggable `Transport` (ureq by default). It maps non-2xx to `HttpError`.
//! - `ConfigService` is the facade. Each operation builds a path and JSON body,
//!   runs it through the client, and reports any failure as `ApolloError`.
//! - Both are immutable after construction and can be shared across threads.
//!
//! ```no_run
//! use apollo_core::{ApolloClient, ClientConfig, ConfigService, NamespaceId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("http://apollo-portal.example.com", "your-token")?;
//! let service = ConfigService::new(ApolloClient::new(config));
//! let ns = NamespaceId::new("myApp", "DEV", "default", "application");
//!
//! service.publish_single(&ns, "timeout", "5000", "raise timeout", "admin")?;
//! assert_eq!(service.get_item(&ns, "timeout")?, "5000");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod path;
pub mod service;
pub mod types;

pub use client::ApolloClient;
pub use config::ClientConfig;
pub use error::{ApolloError, ApolloErrorKind, ConfigError, HttpError, Operation, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use service::ConfigService;
pub use types::{Item, ItemRequest, NamespaceId, ReleaseRequest};
