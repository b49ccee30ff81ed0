use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sd3_api::config::ServerConfig;
use sd3_api::router::build_app_router;
use sd3_api::state::AppState;
use sd3_core::JobRegistry;
use sd3_pipeline::{reconcile_registry, JobOrchestrator};
use sd3_storage::{ResultStore, S3ResultStore};
use sd3_torchserve::TorchServeClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sd3_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Result store ---
    let store = Arc::new(
        S3ResultStore::from_env(
            config.s3_bucket.clone(),
            config.s3_prefix.clone(),
            config.s3_force_path_style,
        )
        .await,
    );
    tracing::info!(bucket = %config.s3_bucket, prefix = %config.s3_prefix, "Result store client created");

    // --- Inference client ---
    let generator = Arc::new(TorchServeClient::new(config.torchserve_url.clone()));
    tracing::info!(url = %config.torchserve_url, "Inference client created");

    // --- Registry + startup reconciliation ---
    // Runs to completion before the listener binds, so no submitted id can
    // collide with a reconciled one.
    let registry = Arc::new(JobRegistry::new());
    let seeded = reconcile_registry(&registry, store.as_ref()).await;
    tracing::info!(seeded, "Registry seeded from result store");

    // --- Orchestrator ---
    let orchestrator = Arc::new(JobOrchestrator::new(
        Arc::clone(&registry),
        generator,
        Arc::clone(&store) as Arc<dyn ResultStore>,
        config.s3_prefix.clone(),
    ));

    // --- App state / router ---
    let state = AppState {
        config: Arc::new(config.clone()),
        orchestrator,
    };
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

    // In-flight background jobs are detached tasks; any that have not
    // reached the store by now are dropped with the runtime.
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager
/// (e.g. systemd, Docker, Kubernetes).
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
