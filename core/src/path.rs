//! Resource paths under `/openapi/v1`.
//!
//! Every caller-supplied identifier is percent-encoded as a single path
//! segment, so `/` in a key becomes `%2F` instead of a new segment and a
//! space becomes `%20`.

use url::form_urlencoded;

use crate::types::NamespaceId;

/// Percent-encode `raw` as UTF-8 for use as one path segment or query value.
///
/// Only ASCII alphanumerics and `*-._` pass through unchanged. `&str` is
/// always valid UTF-8, so this cannot fail.
pub fn encode_segment(raw: &str) -> String {
    // form encoding writes a space as '+'; a literal '+' is already '%2B',
    // so rewriting the remaining '+' is exact.
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// `/openapi/v1/apps/{app}/envs/{env}/clusters/{cluster}/namespaces/{namespace}`
pub fn namespace_path(ns: &NamespaceId) -> String {
    format!(
        "/openapi/v1/apps/{}/envs/{}/clusters/{}/namespaces/{}",
        encode_segment(&ns.app_id),
        encode_segment(&ns.env),
        encode_segment(&ns.cluster),
        encode_segment(&ns.namespace),
    )
}

/// Create-or-update endpoint. The trailing slash is part of the route.
pub fn items_create_path(ns: &NamespaceId) -> String {
    format!("{}/items/", namespace_path(ns))
}

pub fn items_path(ns: &NamespaceId) -> String {
    format!("{}/items", namespace_path(ns))
}

pub fn item_path(ns: &NamespaceId, key: &str) -> String {
    format!("{}/items/{}", namespace_path(ns), encode_segment(key))
}

pub fn item_delete_path(ns: &NamespaceId, key: &str, operator: &str) -> String {
    format!("{}?operator={}", item_path(ns, key), encode_segment(operator))
}

pub fn releases_path(ns: &NamespaceId) -> String {
    format!("{}/releases", namespace_path(ns))
}
