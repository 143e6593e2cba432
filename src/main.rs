//! Cloud Clipboard server binary.

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloud_clipboard::{create_router, spawn_expiry_sweeper, AppState, Config};

/// Main entry point for the Cloud Clipboard server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the file catalog and create the clipboard cache
/// 4. Start the background expiry sweeper
/// 5. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloud_clipboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cloud Clipboard server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: clipboard={}B/{} items, max_file={}B, max_storage={}B, speed_limit={}B/s, port={}",
        config.clipboard_max_memory,
        config.clipboard_max_items,
        config.max_file_size,
        config.max_storage,
        config.speed_limit,
        config.server_port
    );

    let addr = format!("{}:{}", config.host, config.server_port);
    let interval = config.cleanup_interval();
    let max_age_ms = config.max_age_ms;

    let state = AppState::from_config(config).context("failed to initialize storage")?;
    info!(
        "File catalog opened at {}",
        state.files.document_path().display()
    );

    let sweeper = spawn_expiry_sweeper(state.files.clone(), interval, max_age_ms);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper.
async fn shutdown_signal(sweeper: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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

    sweeper.abort();
    warn!("Expiry sweeper aborted");
}
