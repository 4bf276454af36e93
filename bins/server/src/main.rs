//! Ledgerline API Server
//!
//! Main entry point for the opening balance posting service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ledgerline_api::{AppState, ErrorExposure, create_router};
use ledgerline_db::connect_with_pool;
use ledgerline_shared::config::{is_production, run_mode};
use ledgerline_shared::{AppConfig, JwtConfig, JwtService};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ledgerline=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(config.log.json);

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .context("access token expiry out of range")?,
    });

    let run_mode = run_mode();
    let errors = ErrorExposure {
        expose_details: config.server.expose_error_details,
        allow_debug_header: !is_production(&run_mode),
    };
    info!(
        run_mode = %run_mode,
        batch_prefix = %config.opening_balance.batch_prefix,
        expose_error_details = errors.expose_details,
        "Opening balance service configured"
    );

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        opening_balance: Arc::new(config.opening_balance.clone()),
        errors,
    };

    let app = create_router(state).layer(TimeoutLayer::new(Duration::from_secs(30)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
