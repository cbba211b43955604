//! gcache node - a distributed read-through cache server
//!
//! Runs one cluster member: a "scores" demo group backed by a deliberately
//! slow origin table, served to peers over HTTP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gcache::{create_router, Config, HttpPool, Loader, LoaderError, Registry};

/// Stand-in for a slow backing database.
struct SlowStore {
    rows: HashMap<&'static str, &'static str>,
}

impl SlowStore {
    fn new() -> Self {
        let rows = HashMap::from([("alice", "630"), ("bob", "589"), ("carol", "567")]);
        Self { rows }
    }
}

#[async_trait]
impl Loader for SlowStore {
    async fn load(&self, key: &str) -> Result<Vec<u8>, LoaderError> {
        info!(key, "origin lookup");
        // Pretend every origin read is expensive.
        tokio::time::sleep(Duration::from_millis(200)).await;
        self.rows
            .get(key)
            .map(|v| v.as_bytes().to_vec())
            .ok_or_else(|| format!("{key} not found").into())
    }
}

/// Main entry point for a gcache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the group registry and the demo group
/// 4. Build the HTTP pool and install the peer membership
/// 5. Start the HTTP server on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gcache node");

    let config = Config::from_env();
    info!(
        cache_bytes = config.cache_bytes,
        port = config.server_port,
        self_url = %config.self_url,
        peers = config.peers.len(),
        "configuration loaded"
    );

    let registry = Arc::new(Registry::new());
    let group = registry.new_group("scores", config.cache_bytes, Box::new(SlowStore::new()));

    let pool = Arc::new(HttpPool::new(config.self_url.clone(), registry));
    pool.set_peers(&config.peers);
    group.register_peers(pool.clone());

    let app = create_router(pool);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind server port");
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
