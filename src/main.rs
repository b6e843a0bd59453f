use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shuttle_booking::config::database::DatabaseConfig;
use shuttle_booking::config::environment::EnvironmentConfig;
use shuttle_booking::database::DatabaseConnection;
use shuttle_booking::repositories::MemoryStore;
use shuttle_booking::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shuttle_booking=debug,tower_http=info")),
        )
        .init();

    info!("🚌 Campus Shuttle Booking API");
    info!("============================");

    let config = EnvironmentConfig::from_env().context("invalid configuration")?;
    info!("⚙️  Environment: {}", config.environment);

    let state = match config.database_url.clone() {
        Some(url) => {
            let db_config = DatabaseConfig::from_env(url)?;
            let connection = match DatabaseConnection::connect(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Could not connect to the database: {:#}", e);
                    return Err(e);
                }
            };
            info!("✅ Using PostgreSQL storage");
            AppState::postgres(connection.pool().clone(), config)
        }
        None => {
            warn!("⚠️ DATABASE_URL not set, using in-memory storage (data is lost on restart)");
            AppState::in_memory(Arc::new(MemoryStore::new()), config)
        }
    };

    state
        .auth
        .ensure_default_admin(&state.default_admin())
        .await
        .map_err(|e| anyhow::anyhow!("default admin bootstrap failed: {}", e))?;

    let addr: SocketAddr = state
        .config
        .server_url()
        .parse()
        .context("invalid HOST/PORT")?;

    let app = create_router(state);

    info!("🌐 Server listening on http://{}", addr);
    info!("🔍 Endpoints:");
    info!("   GET    /health");
    info!("   POST   /api/register | /api/login");
    info!("   GET    /api/routes | /api/routes/:id | /api/routes/:id/availability?time=");
    info!("   POST   /api/routes   PUT/DELETE /api/routes/:id  (coordinator/admin)");
    info!("   GET    /api/driver/my-route/:driverId | /api/drivers");
    info!("   POST   /api/bookings  GET /api/bookings?studentId=  GET/DELETE /api/bookings/:id");
    info!("   POST   /api/incidents (staff)  GET /api/dashboard-summary");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("👋 Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Could not install the Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ Could not install the SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 SIGTERM received, shutting down...");
        },
    }
}
