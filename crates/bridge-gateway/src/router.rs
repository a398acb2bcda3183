//! Route table and handlers for the gateway.

use crate::actions::is_action_allowed;
use crate::ledger::LedgerRpc;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use bridge_core::{BridgeError, ErrorSink, RoutingBridge};
use bridge_types::LedgerCallback;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Routing bridge the callback endpoint feeds.
    pub bridge: Arc<RoutingBridge>,
    /// RPC capability against the ledger node.
    pub ledger: Arc<dyn LedgerRpc>,
    /// Sink for contained failures (malformed callback bodies).
    pub sink: Arc<dyn ErrorSink>,
}

/// Build the gateway route table.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/callback", post(handle_callback))
        .route("/rpc", post(handle_rpc))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Ledger block callback.
///
/// The response is ALWAYS an empty object regardless of processing outcome;
/// routing happens on a spawned task so the node is acked immediately.
async fn handle_callback(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    match serde_json::from_slice::<LedgerCallback>(&body) {
        Ok(callback) => {
            let bridge = Arc::clone(&state.bridge);
            tokio::spawn(async move {
                bridge.handle(&callback).await;
            });
        }
        Err(e) => {
            let err = BridgeError::malformed("callback body", e);
            warn!(error = %err, "Callback body dropped");
            state.sink.record(&err);
        }
    }

    Json(json!({}))
}

/// RPC pass-through.
///
/// Allowed actions are forwarded verbatim to the ledger node; everything
/// else answers a structured error object, never an HTTP error status.
async fn handle_rpc(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        return Json(json!({ "error": "invalid request" }));
    };

    let Some(action) = request.get("action").and_then(Value::as_str) else {
        return Json(json!({ "error": "unknown action" }));
    };

    if !is_action_allowed(action) {
        warn!(action = action, "Unknown RPC action");
        return Json(json!({ "error": "unknown action" }));
    }

    let correlation_id = Uuid::new_v4();
    debug!(%correlation_id, action = action, "Forwarding RPC action");

    match state.ledger.call(&request).await {
        Ok(response) => Json(response),
        Err(e) => {
            error!(%correlation_id, action = action, error = %e, "Forwarded RPC action failed");
            Json(json!({ "error": e.to_string() }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::GatewayError;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bridge_bus::InMemoryBus;
    use bridge_core::{AccountIndex, CollectingSink, InMemoryAccountIndex};
    use tower::ServiceExt;

    /// Ledger mock that echoes the forwarded body under "echo".
    struct EchoLedger;

    #[async_trait]
    impl LedgerRpc for EchoLedger {
        async fn call(&self, body: &Value) -> Result<Value, GatewayError> {
            Ok(json!({ "echo": body }))
        }
    }

    /// Ledger mock that always fails upstream.
    struct DownLedger;

    #[async_trait]
    impl LedgerRpc for DownLedger {
        async fn call(&self, _body: &Value) -> Result<Value, GatewayError> {
            Err(GatewayError::Upstream("connection refused".to_string()))
        }
    }

    struct Fixture {
        router: Router,
        sink: Arc<CollectingSink>,
        bus: Arc<InMemoryBus>,
        index: Arc<InMemoryAccountIndex>,
    }

    fn fixture(ledger: Arc<dyn LedgerRpc>) -> Fixture {
        let bus = Arc::new(InMemoryBus::new());
        let index = Arc::new(InMemoryAccountIndex::new());
        let sink = Arc::new(CollectingSink::new());
        let bridge = Arc::new(RoutingBridge::new(
            index.clone(),
            bus.clone(),
            sink.clone(),
        ));
        let router = build_router(AppState {
            bridge,
            ledger,
            sink: sink.clone(),
        });
        Fixture {
            router,
            sink,
            bus,
            index,
        }
    }

    async fn post_json(router: Router, path: &str, body: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn test_callback_always_acks_empty() {
        let f = fixture(Arc::new(EchoLedger));

        let (status, body) = post_json(
            f.router,
            "/callback",
            r#"{"account":"A1","amount":"1","block":"{\"type\":\"open\"}"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn test_malformed_callback_still_acks_empty() {
        let f = fixture(Arc::new(EchoLedger));

        let (status, body) = post_json(f.router.clone(), "/callback", "not-json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
        assert_eq!(f.sink.len(), 1);
    }

    #[tokio::test]
    async fn test_callback_routes_to_owner() {
        let f = fixture(Arc::new(EchoLedger));
        f.index
            .put_many(&["A1".into()], &"W1".into())
            .await
            .unwrap();
        let mut sub = f.bus.subscribe_filter("wallet/W1/block/open").unwrap();

        let (status, _) = post_json(
            f.router,
            "/callback",
            r#"{"account":"A1","amount":"1","block":"{\"type\":\"open\"}"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (message, _) = tokio::time::timeout(std::time::Duration::from_secs(1), sub.recv())
            .await
            .expect("timeout")
            .expect("message");
        assert_eq!(message.topic, "wallet/W1/block/open");
    }

    #[tokio::test]
    async fn test_rpc_unknown_action() {
        let f = fixture(Arc::new(EchoLedger));

        let (status, body) =
            post_json(f.router, "/rpc", r#"{"action":"wallet_destroy"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error": "unknown action" }));
    }

    #[tokio::test]
    async fn test_rpc_missing_action() {
        let f = fixture(Arc::new(EchoLedger));

        let (_, body) = post_json(f.router, "/rpc", r#"{"count":"5"}"#).await;
        assert_eq!(body, json!({ "error": "unknown action" }));
    }

    #[tokio::test]
    async fn test_rpc_forwards_allowed_action_verbatim() {
        let f = fixture(Arc::new(EchoLedger));

        let (status, body) = post_json(
            f.router,
            "/rpc",
            r#"{"action":"account_info","account":"A1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["echo"]["action"], "account_info");
        assert_eq!(body["echo"]["account"], "A1");
    }

    #[tokio::test]
    async fn test_rpc_upstream_failure_is_error_object() {
        let f = fixture(Arc::new(DownLedger));

        let (status, body) =
            post_json(f.router, "/rpc", r#"{"action":"account_info"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
    }
}
