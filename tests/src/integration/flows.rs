//! # Integration Test Flows
//!
//! Tests that the bus, the account index, the dispatcher, and the gateway
//! work together end to end:
//!
//! 1. **Wallet → bus → Ownership Update Handler → Account Index**: an
//!    ownership declaration published on `wallet/<id>/accounts` lands in the
//!    index.
//! 2. **Ledger node → gateway → Routing Bridge → bus**: a block callback
//!    posted to `/callback` reaches the owning wallet's block topic with the
//!    verbatim payload.
//! 3. **Send redirect**: a `send` callback reaches the *recipient's* wallet.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use async_trait::async_trait;
    use bridge_bus::{BusMessage, DeliveryOptions, InMemoryBus, MessagePublisher, Subscription};
    use bridge_core::{
        AccountIndex, BusDispatcher, CollectingSink, InMemoryAccountIndex,
        OwnershipUpdateHandler, RoutingBridge, SubscriptionManager,
    };
    use bridge_gateway::{build_router, AppState, GatewayError, LedgerRpc};
    use bridge_types::{Account, LedgerCallback, WalletId};
    use serde_json::{json, Value};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Ledger stub; the integration flows never reach the node.
    struct NullLedger;

    #[async_trait]
    impl LedgerRpc for NullLedger {
        async fn call(&self, _body: &Value) -> Result<Value, GatewayError> {
            Ok(json!({}))
        }
    }

    struct Harness {
        bus: Arc<InMemoryBus>,
        index: Arc<InMemoryAccountIndex>,
        sink: Arc<CollectingSink>,
        router: axum::Router,
    }

    /// Wire the full bridge over in-memory transports, exactly as the
    /// runtime does.
    fn harness() -> Harness {
        let bus = Arc::new(InMemoryBus::new());
        let index = Arc::new(InMemoryAccountIndex::new());
        let sink = Arc::new(CollectingSink::new());

        let manager = SubscriptionManager::new(bus.clone());
        let subscriptions = manager
            .ensure_subscribed()
            .expect("subscribe")
            .expect("first call");

        let ownership = Arc::new(OwnershipUpdateHandler::new(index.clone(), sink.clone()));
        let _dispatcher = BusDispatcher::new(ownership).spawn(subscriptions);

        let bridge = Arc::new(RoutingBridge::new(
            index.clone(),
            bus.clone(),
            sink.clone(),
        ));
        let router = build_router(AppState {
            bridge,
            ledger: Arc::new(NullLedger),
            sink: sink.clone(),
        });

        Harness {
            bus,
            index,
            sink,
            router,
        }
    }

    async fn declare_ownership(harness: &Harness, wallet: &str, accounts: &str) {
        harness
            .bus
            .publish(BusMessage::new(
                format!("wallet/{wallet}/accounts"),
                accounts.as_bytes().to_vec(),
                DeliveryOptions::default(),
            ))
            .await
            .expect("publish");
    }

    async fn post_callback(harness: &Harness, body: String) -> StatusCode {
        let response = harness
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/callback")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");
        response.status()
    }

    async fn wait_for_index(index: &InMemoryAccountIndex, len: usize) {
        for _ in 0..100 {
            if index.len() == len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("index never reached {len} records");
    }

    async fn recv_one(sub: &mut Subscription) -> BusMessage {
        timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timeout waiting for bus message")
            .expect("bus closed")
            .0
    }

    // =========================================================================
    // FLOWS
    // =========================================================================

    #[tokio::test]
    async fn ownership_declaration_lands_in_index() {
        let h = harness();

        declare_ownership(&h, "W5", r#"["A1","A2","A3"]"#).await;
        wait_for_index(&h.index, 3).await;

        for account in ["A1", "A2", "A3"] {
            let owner = h
                .index
                .lookup(&Account::from(account))
                .await
                .expect("lookup");
            assert_eq!(owner, Some(WalletId::from("W5")));
        }
        assert!(h.sink.is_empty());
    }

    #[tokio::test]
    async fn callback_reaches_owning_wallet_topic() {
        let h = harness();

        declare_ownership(&h, "W1", r#"["A1"]"#).await;
        wait_for_index(&h.index, 1).await;

        let mut sub = h
            .bus
            .subscribe_filter("wallet/W1/block/open")
            .expect("subscribe");

        let body = json!({
            "account": "A1",
            "amount": "1000",
            "block": "{\"type\":\"open\"}",
        });
        let status = post_callback(&h, body.to_string()).await;
        assert_eq!(status, StatusCode::OK);

        let message = recv_one(&mut sub).await;
        let republished: LedgerCallback =
            serde_json::from_slice(&message.payload).expect("payload");
        assert_eq!(republished.account, Account::from("A1"));
        assert_eq!(republished.block, "{\"type\":\"open\"}");
    }

    #[tokio::test]
    async fn send_callback_reaches_recipient_wallet() {
        let h = harness();

        declare_ownership(&h, "W1", r#"["A1"]"#).await;
        declare_ownership(&h, "W2", r#"["A2"]"#).await;
        wait_for_index(&h.index, 2).await;

        // Listen on both wallets; only the recipient's must fire.
        let mut recipient = h
            .bus
            .subscribe_filter("wallet/W2/block/send")
            .expect("subscribe");
        let mut sender = h
            .bus
            .subscribe_filter("wallet/W1/block/send")
            .expect("subscribe");

        let body = json!({
            "account": "A1",
            "amount": "1000",
            "block": "{\"type\":\"send\",\"destination\":\"A2\"}",
        });
        post_callback(&h, body.to_string()).await;

        let message = recv_one(&mut recipient).await;
        assert_eq!(message.topic, "wallet/W2/block/send");

        // Give the sender-side subscription a moment; it must stay silent.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(matches!(sender.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn untracked_account_publishes_nothing() {
        let h = harness();

        let body = json!({
            "account": "A9",
            "amount": "1",
            "block": "{\"type\":\"open\"}",
        });
        post_callback(&h, body.to_string()).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        // Only the inbound declaration channels exist; nothing was routed.
        assert_eq!(h.bus.messages_published(), 0);
        assert!(h.sink.is_empty());
    }

    #[tokio::test]
    async fn malformed_declaration_then_valid_one_still_works() {
        let h = harness();

        declare_ownership(&h, "W1", "not-json").await;
        declare_ownership(&h, "W2", r#"["A7"]"#).await;

        wait_for_index(&h.index, 1).await;
        let owner = h.index.lookup(&Account::from("A7")).await.expect("lookup");
        assert_eq!(owner, Some(WalletId::from("W2")));
        assert_eq!(h.sink.len(), 1);
    }
}
