//! # Bridge Node Runtime
//!
//! The main entry point for the ledger bridge.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration (file + env); an unparseable file is fatal here,
//!    before any component is constructed
//! 3. Build shared infrastructure (bus, account index, error sink)
//! 4. Register the inbound bus subscriptions and start the dispatcher
//! 5. Start the gateway HTTP server
//! 6. Wait for Ctrl+C, then signal shutdown
//!
//! ## Wiring
//!
//! Connection handles are constructed once here and injected into each
//! component as the capability it needs: the routing bridge gets an
//! index-read and a bus-publish handle, the ownership handler an
//! index-write handle. No component reaches for a global.

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bridge_bus::InMemoryBus;
use bridge_core::{
    BusDispatcher, InMemoryAccountIndex, LogSink, OwnershipUpdateHandler, RoutingBridge,
    SubscriptionManager,
};
use bridge_gateway::{build_router, AppState, HttpLedgerClient};

use crate::config::BridgeConfig;

/// The bridge runtime orchestrating all components.
struct BridgeRuntime {
    config: BridgeConfig,
    /// Shutdown signal sender.
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl BridgeRuntime {
    fn new(config: BridgeConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        Self {
            config,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Start the bridge.
    async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  Ledger Bridge v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        // Shared infrastructure, constructed once and injected.
        let bus = Arc::new(InMemoryBus::with_capacity(self.config.bus.channel_capacity));
        let index = Arc::new(InMemoryAccountIndex::new());
        let sink = Arc::new(LogSink);

        // Inbound subscriptions and the dispatch loop.
        let manager = SubscriptionManager::new(bus.clone());
        let subscriptions = manager
            .ensure_subscribed()
            .context("Failed to register bus subscriptions")?
            .context("Subscriptions already registered")?;

        let ownership = Arc::new(OwnershipUpdateHandler::new(index.clone(), sink.clone()));
        let dispatcher = BusDispatcher::new(ownership);
        let mut dispatcher_shutdown = self.shutdown_rx.clone();
        let dispatcher_task = dispatcher.spawn(subscriptions);
        tokio::spawn(async move {
            if dispatcher_shutdown.changed().await.is_ok() {
                info!("[dispatcher] Shutdown signal received");
                dispatcher_task.abort();
            }
        });

        // Gateway HTTP server.
        let bridge = Arc::new(RoutingBridge::new(index.clone(), bus.clone(), sink.clone()));
        let ledger = Arc::new(
            HttpLedgerClient::new(
                self.config.ledger.rpc_url.clone(),
                Duration::from_secs(self.config.ledger.rpc_timeout_secs),
            )
            .context("Failed to construct ledger RPC client")?,
        );
        let router = build_router(AppState {
            bridge,
            ledger,
            sink,
        });

        let listener = tokio::net::TcpListener::bind(&self.config.gateway.listen_addr)
            .await
            .with_context(|| {
                format!("Failed to bind {}", self.config.gateway.listen_addr)
            })?;
        info!(addr = %self.config.gateway.listen_addr, "Gateway listening");

        let mut server_shutdown = self.shutdown_rx.clone();
        tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = server_shutdown.changed().await;
                })
                .await;
            if let Err(e) = result {
                error!(error = %e, "Gateway server stopped");
            }
        });

        info!("All components running");
        info!("Ledger node RPC: {}", self.config.ledger.rpc_url);
        Ok(())
    }

    /// Shutdown the bridge gracefully.
    async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        // Give handlers time to clean up
        tokio::time::sleep(Duration::from_secs(1)).await;

        info!("Shutdown complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration; an unparseable file terminates the process here,
    // before any connection is made.
    let path = std::env::var("BRIDGE_CONFIG")
        .unwrap_or_else(|_| "bridge.toml".to_string());
    let mut config =
        BridgeConfig::load(std::path::Path::new(&path)).context("Fatal configuration error")?;
    config.apply_env();

    // Create and start the runtime
    let runtime = BridgeRuntime::new(config);
    runtime.start().await?;

    // Keep the bridge running
    info!("Bridge is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    runtime.shutdown().await;

    Ok(())
}
