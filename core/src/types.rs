//! Wire models for the Portal OpenAPI.
//!
//! Field names follow the server's camelCase JSON. Request types borrow their
//! strings since they only live long enough to be serialized.

use serde::{Deserialize, Serialize};

/// Coordinates of a namespace: `(app id, env, cluster, namespace)`.
///
/// Values are stored raw; percent-encoding happens when a path is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceId {
    pub app_id: String,
    pub env: String,
    pub cluster: String,
    pub namespace: String,
}

impl NamespaceId {
    pub fn new(
        app_id: impl Into<String>,
        env: impl Into<String>,
        cluster: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            env: env.into(),
            cluster: cluster.into(),
            namespace: namespace.into(),
        }
    }
}

/// A config item as returned by the items endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub comment: Option<String>,
    /// Operator of the last write.
    #[serde(default)]
    pub data_change_created_by: Option<String>,
}

/// Body of `POST .../items/`. The server creates the item or overwrites it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub comment: &'a str,
    pub data_change_created_by: &'a str,
}

/// Body of `POST .../releases`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRequest<'a> {
    pub release_title: &'a str,
    pub released_by: &'a str,
    pub release_comment: &'a str,
}
