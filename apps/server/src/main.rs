//! # Taller Server
//!
//! Entry point: configuration, database, optional demo seed, HTTP listener.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  env ──► ServerConfig ──► Database (migrate) ──► seed? ──► axum::serve │
//! │                                                          │              │
//! │                                   Ctrl+C / SIGTERM ──────┘ ──► close    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use taller_db::{seed, Database, DbConfig};
use taller_server::{router, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Taller server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        addr = %config.bind_addr,
        db = %config.database_path.display(),
        policy = ?config.stock_policy,
        "Configuration loaded"
    );

    // Open database (migrations run on connect)
    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.max_connections),
    )
    .await?;

    if config.seed_demo {
        let inserted = seed::seed_demo_products(&db).await?;
        if inserted > 0 {
            info!(inserted, "Demo catalogue seeded");
        }
    }

    let app = router(AppState::new(db.clone(), config.stock_policy));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,taller=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
