//! Item and release lifecycle against the live mock portal.
//!
//! # Design
//! Starts the mock server on a random port in a background runtime, then
//! drives every `ConfigService` operation over real HTTP with the default
//! ureq transport.

use std::net::SocketAddr;

use apollo_core::{ApolloClient, ApolloErrorKind, ClientConfig, ConfigService, NamespaceId, Operation};
use mock_server::{AppState, Release};

const TOKEN: &str = "integration-token";

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, AppState::with_token(TOKEN)).await
        })
        .unwrap();
    });

    addr
}

fn service(addr: SocketAddr, token: &str) -> ConfigService {
    let config = ClientConfig::new(&format!("http://{addr}/"), token).unwrap();
    ConfigService::new(ApolloClient::new(config))
}

fn latest_release(service: &ConfigService, ns: &NamespaceId) -> Release {
    let path = format!("{}/releases/latest", apollo_core::path::namespace_path(ns));
    let body = service.client().get(&path).unwrap();
    serde_json::from_str(&body).unwrap()
}

#[test]
fn item_and_release_lifecycle() {
    let addr = start_server();
    let svc = service(addr, TOKEN);
    let ns = NamespaceId::new("myApp", "DEV", "default", "application");

    // Step 1: fresh namespace lists nothing.
    assert!(svc.list_namespace_items(&ns).unwrap().is_empty());

    // Step 2: write, then read back. Writing the same thing twice changes nothing.
    svc.create_or_update_item(&ns, "retries", "3", "initial", "admin")
        .unwrap();
    svc.create_or_update_item(&ns, "retries", "3", "initial", "admin")
        .unwrap();
    assert_eq!(svc.get_item(&ns, "retries").unwrap(), "3");
    assert_eq!(svc.list_namespace_items(&ns).unwrap().len(), 1);

    let record = svc.get_item_record(&ns, "retries").unwrap();
    assert_eq!(record.comment.as_deref(), Some("initial"));
    assert_eq!(record.data_change_created_by.as_deref(), Some("admin"));

    // Step 3: publish_single writes and releases in one call.
    svc.publish_single(&ns, "timeout", "5000", "raise timeout", "ops")
        .unwrap();
    assert_eq!(svc.get_item(&ns, "timeout").unwrap(), "5000");

    let release = latest_release(&svc, &ns);
    assert_eq!(release.release_title, "Auto release - timeout");
    assert_eq!(release.released_by, "ops");
    assert_eq!(release.release_comment.as_deref(), Some("raise timeout"));
    assert_eq!(release.configurations.get("timeout").map(String::as_str), Some("5000"));
    assert_eq!(release.configurations.get("retries").map(String::as_str), Some("3"));

    // Step 4: a plain write is stored but not released.
    svc.create_or_update_item(&ns, "timeout", "8000", "", "ops")
        .unwrap();
    assert_eq!(svc.get_item(&ns, "timeout").unwrap(), "8000");
    let release = latest_release(&svc, &ns);
    assert_eq!(release.configurations.get("timeout").map(String::as_str), Some("5000"));

    // Step 5: explicit publish picks it up.
    svc.publish_namespace(&ns, "manual", "ship it", "ops").unwrap();
    let release = latest_release(&svc, &ns);
    assert_eq!(release.release_title, "manual");
    assert_eq!(release.configurations.get("timeout").map(String::as_str), Some("8000"));

    // Step 6: list keeps server order.
    let keys: Vec<String> = svc
        .list_namespace_items(&ns)
        .unwrap()
        .into_iter()
        .map(|i| i.key)
        .collect();
    assert_eq!(keys, vec!["retries".to_string(), "timeout".to_string()]);

    // Step 7: delete, then the item is gone.
    svc.delete_item(&ns, "timeout", "ops team").unwrap();
    let err = svc.get_item(&ns, "timeout").unwrap_err();
    assert_eq!(err.operation, Operation::GetItem);
    assert_eq!(err.target, "timeout");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.http_error().unwrap().body, "item not found");

    // Step 8: deleting again reports the same 404.
    let err = svc.delete_item(&ns, "timeout", "ops team").unwrap_err();
    assert_eq!(err.operation, Operation::DeleteItem);
    assert_eq!(err.status(), Some(404));
}

#[test]
fn identifiers_needing_encoding_round_trip() {
    let addr = start_server();
    let svc = service(addr, TOKEN);
    let ns = NamespaceId::new("my app", "DEV", "east/1", "team a.yaml");

    svc.create_or_update_item(&ns, "feature/flag on", "true", "", "ops")
        .unwrap();
    assert_eq!(svc.get_item(&ns, "feature/flag on").unwrap(), "true");

    let items = svc.list_namespace_items(&ns).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].key, "feature/flag on");

    // A different namespace with the same raw prefix stays separate.
    let other = NamespaceId::new("my app", "DEV", "east", "1");
    assert!(svc.list_namespace_items(&other).unwrap().is_empty());
}

#[test]
fn wrong_token_is_rejected_as_http_401() {
    let addr = start_server();
    let svc = service(addr, "wrong");
    let ns = NamespaceId::new("myApp", "DEV", "default", "application");

    let err = svc.list_namespace_items(&ns).unwrap_err();
    assert_eq!(err.operation, Operation::ListNamespaceItems);
    assert_eq!(err.target, "application");
    assert_eq!(err.status(), Some(401));
}

#[test]
fn unreachable_server_is_a_transport_error_without_status() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let svc = service(addr, TOKEN);
    let ns = NamespaceId::new("myApp", "DEV", "default", "application");

    let err = svc.get_item(&ns, "timeout").unwrap_err();
    assert!(matches!(err.kind, ApolloErrorKind::Transport(_)));
    assert_eq!(err.status(), None);
}
