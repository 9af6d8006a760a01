//! Integration tests for the relay server and client
//!
//! These tests run a real server on an ephemeral port and talk to it over HTTP.

use client::network::RelayClient;
use client::payload::build_payload;
use client::poller::Poller;
use serde_json::{json, Value};
use server::config::ServerConfig;
use server::network::{AppState, Server};
use shared::{ActionPayload, MAX_BUFFER_SIZE, NO_RECENT_ACTIONS};
use std::net::SocketAddr;
use std::time::Duration;

const TEST_ORIGIN: &str = "http://localhost:8000";

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        allowed_origin: TEST_ORIGIN.to_string(),
    }
}

/// Starts a server in the background and returns its address and state
async fn spawn_server() -> (SocketAddr, AppState) {
    let state = AppState::new();
    let server = Server::bind_with_state(&test_config(), state.clone())
        .await
        .expect("Failed to bind test server");
    let addr = server.local_addr();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    (addr, state)
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

fn payload(value: Value) -> ActionPayload {
    match value {
        Value::Object(map) => map,
        _ => panic!("test payload must be an object"),
    }
}

/// RELAY ENDPOINT TESTS
mod endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn health_check() {
        let (addr, _) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();

        let message = relay.health().await.unwrap();
        assert_eq!(message, "✅ Colonization server is live and listening");
    }

    #[tokio::test]
    async fn poll_before_any_action() {
        let (addr, _) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();

        let update = relay.latest_update().await.unwrap();
        assert_eq!(update.message, NO_RECENT_ACTIONS);
    }

    #[tokio::test]
    async fn push_then_poll() {
        let (addr, state) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();

        let status = relay
            .push_action(&payload(json!({"action": "build", "username": "alice"})))
            .await
            .unwrap();
        assert_eq!(status.status, "OK");

        let update = relay.latest_update().await.unwrap();
        assert_eq!(update.message, "build by alice");

        let actions = state.actions.read().await;
        let latest = actions.latest().unwrap();
        assert_eq!(latest.payload.get("action"), Some(&json!("build")));
        assert!(latest.timestamp_iso().ends_with('Z'));
    }

    #[tokio::test]
    async fn repeated_polls_return_same_message() {
        let (addr, _) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();

        relay
            .push_action(&payload(json!({"action": "farm", "username": "bob"})))
            .await
            .unwrap();

        let first = relay.latest_update().await.unwrap();
        let second = relay.latest_update().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn payload_without_expected_fields() {
        let (addr, _) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();

        relay
            .push_action(&payload(json!({"colony": "north"})))
            .await
            .unwrap();

        let update = relay.latest_update().await.unwrap();
        assert_eq!(update.message, "undefined by undefined");
    }

    #[tokio::test]
    async fn register_is_stateless() {
        let (addr, state) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();

        let player = build_payload(None, Some("alice"), &["colony=north".to_string()]).unwrap();
        let status = relay.register(&player).await.unwrap();
        assert_eq!(status.status, "Registered");

        assert!(state.actions.read().await.is_empty());
        let update = relay.latest_update().await.unwrap();
        assert_eq!(update.message, NO_RECENT_ACTIONS);
    }

    #[tokio::test]
    async fn overflow_evicts_oldest_over_http() {
        let (addr, state) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();

        for i in 0..=MAX_BUFFER_SIZE {
            relay
                .push_action(&payload(
                    json!({"action": "build", "username": format!("user{}", i)}),
                ))
                .await
                .unwrap();
        }

        {
            let actions = state.actions.read().await;
            assert_eq!(actions.len(), MAX_BUFFER_SIZE);
            let first = actions.iter().next().unwrap();
            assert_eq!(first.payload.get("username"), Some(&json!("user1")));

            let stamps: Vec<_> = actions.iter().map(|record| record.timestamp).collect();
            assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]));
        }

        let update = relay.latest_update().await.unwrap();
        assert_eq!(update.message, "build by user100");
    }
}

/// REQUEST VALIDATION TESTS
mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let (addr, state) = spawn_server().await;
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{}/api/action", base_url(addr)))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(state.actions.read().await.is_empty());
    }

    #[tokio::test]
    async fn non_object_json_is_rejected() {
        let (addr, state) = spawn_server().await;
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{}/api/action", base_url(addr)))
            .json(&json!([1, 2, 3]))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(state.actions.read().await.is_empty());
    }

    #[tokio::test]
    async fn action_without_body_is_buffered_empty() {
        let (addr, state) = spawn_server().await;
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{}/api/action", base_url(addr)))
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let status: Value = response.json().await.unwrap();
        assert_eq!(status, json!({"status": "OK"}));

        let actions = state.actions.read().await;
        assert_eq!(actions.len(), 1);
        assert!(actions.latest().unwrap().payload.is_empty());
    }

    #[tokio::test]
    async fn empty_json_body_is_buffered_empty() {
        let (addr, state) = spawn_server().await;
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{}/api/action", base_url(addr)))
            .header("content-type", "application/json")
            .body("")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(state.actions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn text_plain_body_is_treated_as_empty() {
        let (addr, state) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{}/api/action", base_url(addr)))
            .header("content-type", "text/plain;charset=UTF-8")
            .body(r#"{"action":"build","username":"alice"}"#)
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(state.actions.read().await.len(), 1);

        let update = relay.latest_update().await.unwrap();
        assert_eq!(update.message, "undefined by undefined");
    }

    #[tokio::test]
    async fn register_without_body_is_accepted() {
        let (addr, state) = spawn_server().await;
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{}/api/register", base_url(addr)))
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let status: Value = response.json().await.unwrap();
        assert_eq!(status, json!({"status": "Registered"}));
        assert!(state.actions.read().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (addr, _) = spawn_server().await;
        let http = reqwest::Client::new();

        let response = http
            .get(format!("{}/api/history", base_url(addr)))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}

/// CROSS-ORIGIN TESTS
mod cors_tests {
    use super::*;

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let (addr, _) = spawn_server().await;
        let http = reqwest::Client::new();

        let response = http
            .get(format!("{}/api/updates", base_url(addr)))
            .header("origin", TEST_ORIGIN)
            .send()
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            TEST_ORIGIN
        );
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn other_origin_gets_configured_origin_back() {
        let (addr, _) = spawn_server().await;
        let http = reqwest::Client::new();

        let response = http
            .get(format!("{}/api/updates", base_url(addr)))
            .header("origin", "https://elsewhere.test")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        // The allowed origin is fixed; it is never echoed from the request.
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            TEST_ORIGIN
        );
    }

    #[tokio::test]
    async fn preflight_for_json_post() {
        let (addr, _) = spawn_server().await;
        let http = reqwest::Client::new();

        let response = http
            .request(
                reqwest::Method::OPTIONS,
                format!("{}/api/action", base_url(addr)),
            )
            .header("origin", TEST_ORIGIN)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            TEST_ORIGIN
        );
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "content-type"
        );
    }
}

/// POLLER INTEGRATION TESTS
mod poller_tests {
    use super::*;

    #[tokio::test]
    async fn poller_reports_changes_only() {
        let (addr, _) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();
        let mut poller = Poller::new(relay.clone(), Duration::from_millis(10));

        assert_eq!(poller.poll_once().await.unwrap(), None);

        relay
            .push_action(&payload(json!({"action": "build", "username": "alice"})))
            .await
            .unwrap();
        assert_eq!(
            poller.poll_once().await.unwrap(),
            Some("build by alice".to_string())
        );
        assert_eq!(poller.poll_once().await.unwrap(), None);

        relay
            .push_action(&payload(json!({"action": "farm", "username": "bob"})))
            .await
            .unwrap();
        relay
            .push_action(&payload(json!({"action": "trade", "username": "carol"})))
            .await
            .unwrap();

        // Only the newest action is visible; "farm by bob" is never observed.
        assert_eq!(
            poller.poll_once().await.unwrap(),
            Some("trade by carol".to_string())
        );
    }

    #[tokio::test]
    async fn poller_run_stops_after_count() {
        let (addr, _) = spawn_server().await;
        let relay = RelayClient::new(&base_url(addr)).unwrap();
        relay
            .push_action(&payload(json!({"action": "scout", "username": "dave"})))
            .await
            .unwrap();

        let mut poller = Poller::new(relay, Duration::from_millis(5));
        let mut seen = Vec::new();
        poller.run(Some(4), |message| seen.push(message.to_string())).await;

        assert_eq!(poller.polls(), 4);
        assert_eq!(poller.failures(), 0);
        assert_eq!(seen, vec!["scout by dave".to_string()]);
    }
}

/// LIFECYCLE TESTS
mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn graceful_shutdown_stops_server() {
        let server = Server::bind(&test_config()).await.unwrap();
        let addr = server.local_addr();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(server.run_until(async {
            let _ = stop_rx.await;
        }));

        let relay = RelayClient::new(&base_url(addr)).unwrap();
        assert!(relay.health().await.is_ok());
        drop(relay);

        stop_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server did not stop in time")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn restart_starts_empty() {
        let (first_addr, _) = spawn_server().await;
        let first = RelayClient::new(&base_url(first_addr)).unwrap();
        first
            .push_action(&payload(json!({"action": "build", "username": "alice"})))
            .await
            .unwrap();

        let (second_addr, _) = spawn_server().await;
        let second = RelayClient::new(&base_url(second_addr)).unwrap();
        let update = second.latest_update().await.unwrap();
        assert_eq!(update.message, NO_RECENT_ACTIONS);
    }
}
