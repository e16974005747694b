//! Item and release operations on top of `ApolloClient`.
//!
//! # Design
//! Each operation is a `build_*` step that produces an `HttpRequest` and a
//! send step that runs it through the client and decodes the reply. Every
//! failure, whether encoding, transport, or decoding, is reported as one
//! `ApolloError` naming the operation and the key or namespace.
//!
//! Writes are not visible to configuration consumers until the namespace is
//! published. `publish_single` does both, but not atomically: if publishing
//! fails the item stays written and unpublished.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::client::ApolloClient;
use crate::error::{ApolloError, ApolloErrorKind, Operation};
use crate::http::{HttpMethod, HttpRequest, Transport, UreqTransport};
use crate::path;
use crate::types::{Item, ItemRequest, NamespaceId, ReleaseRequest};

const AUTO_RELEASE_TITLE_PREFIX: &str = "Auto release - ";

/// Facade over the Portal's item and release endpoints.
#[derive(Debug, Clone)]
pub struct ConfigService<T = UreqTransport> {
    client: ApolloClient<T>,
}

impl<T: Transport> ConfigService<T> {
    pub fn new(client: ApolloClient<T>) -> Self {
        Self { client }
    }

    /// The underlying client, for endpoints this facade does not cover.
    pub fn client(&self) -> &ApolloClient<T> {
        &self.client
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_create_or_update_item(
        &self,
        ns: &NamespaceId,
        key: &str,
        value: &str,
        comment: &str,
        operator: &str,
    ) -> Result<HttpRequest, serde_json::Error> {
        let body = serde_json::to_string(&ItemRequest {
            key,
            value,
            comment,
            data_change_created_by: operator,
        })?;
        Ok(self
            .client
            .build_request(HttpMethod::Post, &path::items_create_path(ns), Some(body)))
    }

    pub fn build_publish_namespace(
        &self,
        ns: &NamespaceId,
        release_title: &str,
        release_comment: &str,
        released_by: &str,
    ) -> Result<HttpRequest, serde_json::Error> {
        let body = serde_json::to_string(&ReleaseRequest {
            release_title,
            released_by,
            release_comment,
        })?;
        Ok(self
            .client
            .build_request(HttpMethod::Post, &path::releases_path(ns), Some(body)))
    }

    pub fn build_get_item(&self, ns: &NamespaceId, key: &str) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Get, &path::item_path(ns, key), None)
    }

    pub fn build_delete_item(&self, ns: &NamespaceId, key: &str, operator: &str) -> HttpRequest {
        self.client.build_request(
            HttpMethod::Delete,
            &path::item_delete_path(ns, key, operator),
            None,
        )
    }

    pub fn build_list_namespace_items(&self, ns: &NamespaceId) -> HttpRequest {
        self.client
            .build_request(HttpMethod::Get, &path::items_path(ns), None)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Create `key` or overwrite its value. Not visible to consumers until
    /// the namespace is published.
    pub fn create_or_update_item(
        &self,
        ns: &NamespaceId,
        key: &str,
        value: &str,
        comment: &str,
        operator: &str,
    ) -> Result<(), ApolloError> {
        let op = Operation::CreateOrUpdateItem;
        let request = self
            .build_create_or_update_item(ns, key, value, comment, operator)
            .map_err(|e| ApolloError::new(op, key, ApolloErrorKind::Encode(e)))?;
        self.send(op, key, &request)?;
        Ok(())
    }

    /// Create a release, making every pending change in `ns` visible.
    pub fn publish_namespace(
        &self,
        ns: &NamespaceId,
        release_title: &str,
        release_comment: &str,
        released_by: &str,
    ) -> Result<(), ApolloError> {
        let op = Operation::PublishNamespace;
        let target = ns.namespace.as_str();
        let request = self
            .build_publish_namespace(ns, release_title, release_comment, released_by)
            .map_err(|e| ApolloError::new(op, target, ApolloErrorKind::Encode(e)))?;
        self.send(op, target, &request)?;
        Ok(())
    }

    /// Write `key` and publish its namespace with the title
    /// `"Auto release - {key}"`.
    ///
    /// There is no rollback. An error from the publish step means the write
    /// may already be stored but unpublished; re-read with `get_item` or
    /// `list_namespace_items` if the state matters.
    pub fn publish_single(
        &self,
        ns: &NamespaceId,
        key: &str,
        value: &str,
        comment: &str,
        operator: &str,
    ) -> Result<(), ApolloError> {
        self.create_or_update_item(ns, key, value, comment, operator)?;
        let title = format!("{AUTO_RELEASE_TITLE_PREFIX}{key}");
        self.publish_namespace(ns, &title, comment, operator)
            .inspect_err(|err| {
                warn!(
                    app_id = %ns.app_id,
                    env = %ns.env,
                    namespace = %ns.namespace,
                    key,
                    error = %err,
                    "item written but namespace not published"
                );
            })
    }

    /// The current value of `key`.
    pub fn get_item(&self, ns: &NamespaceId, key: &str) -> Result<String, ApolloError> {
        self.get_item_record(ns, key).map(|item| item.value)
    }

    /// The full item record for `key`, including comment and last operator.
    pub fn get_item_record(&self, ns: &NamespaceId, key: &str) -> Result<Item, ApolloError> {
        let op = Operation::GetItem;
        let body = self.send(op, key, &self.build_get_item(ns, key))?;
        decode(op, key, &body)
    }

    /// Remove `key`. Like writes, the removal needs a publish to take effect.
    pub fn delete_item(&self, ns: &NamespaceId, key: &str, operator: &str) -> Result<(), ApolloError> {
        let op = Operation::DeleteItem;
        self.send(op, key, &self.build_delete_item(ns, key, operator))?;
        Ok(())
    }

    /// All items in `ns`, in the order the server returns them.
    pub fn list_namespace_items(&self, ns: &NamespaceId) -> Result<Vec<Item>, ApolloError> {
        let op = Operation::ListNamespaceItems;
        let target = ns.namespace.as_str();
        let body = self.send(op, target, &self.build_list_namespace_items(ns))?;
        decode(op, target, &body)
    }

    fn send(&self, op: Operation, target: &str, request: &HttpRequest) -> Result<String, ApolloError> {
        self.client
            .execute(request)
            .map_err(|e| ApolloError::new(op, target, e))
    }
}

fn decode<D: DeserializeOwned>(op: Operation, target: &str, body: &str) -> Result<D, ApolloError> {
    serde_json::from_str(body).map_err(|e| ApolloError::new(op, target, ApolloErrorKind::Decode(e)))
}
