//! trust-ui - TRUST chart web service entry point
//!
//! Boot sequence: tracing, data folder resolution, configuration, database
//! init, then the HTTP server. Any failure on this path is fatal and exits
//! non-zero; there is no partial-boot recovery.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trust_common::config::{resolve_data_folder, TrustConfig};
use trust_common::db::init_database;
use trust_ui::{build_router, AppState};

/// Command-line arguments for trust-ui
#[derive(Parser, Debug)]
#[command(name = "trust-ui")]
#[command(about = "TRUST chart web service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5780", env = "TRUST_PORT")]
    port: u16,

    /// Folder holding the database, media files and optional trust.toml
    #[arg(short, long, env = "TRUST_DATA_FOLDER")]
    data_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trust_ui=debug,trust_common=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TRUST chart (trust-ui) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let data_folder = resolve_data_folder(args.data_folder.as_deref());
    std::fs::create_dir_all(&data_folder)
        .with_context(|| format!("Failed to create data folder {}", data_folder.display()))?;
    info!("Data folder: {}", data_folder.display());

    let config = TrustConfig::load(&data_folder).context("Failed to load configuration")?;
    std::fs::create_dir_all(&config.media_folder)
        .with_context(|| format!("Failed to create media folder {}", config.media_folder.display()))?;

    let pool = init_database(&config.database_path())
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let state = AppState::new(pool, config);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("trust-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
