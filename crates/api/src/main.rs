use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizimg_api::config::ServerConfig;
use quizimg_api::notifications::FoundLinksNotifier;
use quizimg_api::router::build_app_router;
use quizimg_api::{state, ws};
use quizimg_db::MemoryStore;
use quizimg_events::EventBus;
use quizimg_ingest::IngestState;
use quizimg_workers::WorkerClient;

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizimg_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Document store ---
    let store = Arc::new(MemoryStore::new());
    let questions: quizimg_db::SharedQuestionStore = store.clone();
    let pairs: quizimg_db::SharedImagePairStore = store.clone();
    tracing::info!("In-memory document store created");

    // --- Worker clients ---
    let link_finder = Arc::new(WorkerClient::connect(config.link_finder()).await);
    let compressor = Arc::new(WorkerClient::connect(config.compressor()).await);

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());

    // --- Keepalive ---
    let keepalive_handle = Arc::clone(&ws_manager)
        .spawn_keepalive(Duration::from_secs(config.ws_ping_interval_secs));

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // Spawn the found-links notifier (pushes events to WebSocket clients).
    let notifier = FoundLinksNotifier::new(Arc::clone(&ws_manager));
    let notifier_handle = tokio::spawn(notifier.run(event_bus.subscribe()));

    // --- Ingest listener (worker push surface) ---
    let ingest_state = IngestState {
        questions: Arc::clone(&questions),
        pairs: Arc::clone(&pairs),
        bus: Arc::clone(&event_bus),
        secret: config.ingest_secret.clone(),
    };
    let ingest_addr = config.ingest_addr.clone();
    let ingest_handle = tokio::spawn(async move {
        if let Err(e) = quizimg_ingest::serve(&ingest_addr, ingest_state).await {
            tracing::error!(error = %e, "Ingest server failed");
        }
    });

    // --- App state ---
    let state = AppState {
        questions,
        pairs,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        link_finder,
        compressor,
        event_bus: Arc::clone(&event_bus),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Stop taking worker deliveries.
    ingest_handle.abort();
    tracing::info!("Ingest server stopped");

    // Drop the event bus sender to close the broadcast channel.
    // This signals the notifier to shut down.
    drop(event_bus);
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs.min(5)),
        notifier_handle,
    )
    .await;
    tracing::info!("Found-links notifier shut down");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    keepalive_handle.abort();
    tracing::info!("Keepalive task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
