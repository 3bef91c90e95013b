use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{info, warn};

use echomate_api::bootstrap::app_context::{AppContext, AppServices};
use echomate_api::bootstrap::config::Config;
use echomate_api::infrastructure::crypto::session_token::SessionKeys;
use echomate_api::infrastructure::db;
use echomate_api::infrastructure::db::repositories::tweet_repository_sqlx::SqlxTweetRepository;
use echomate_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use echomate_api::infrastructure::storage::FsImageStorage;
use echomate_api::presentation::http::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "echomate_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        uploads_dir = %cfg.uploads_dir,
        origins = ?cfg.cors_origins,
        production = cfg.is_production,
        "Starting EchoMate backend"
    );

    let pool = db::connect_pool(&cfg.database_url, cfg.db_max_connections).await?;
    db::migrate(&pool).await?;

    if let Err(e) = tokio::fs::create_dir_all(&cfg.uploads_dir).await {
        warn!(error = ?e, dir = %cfg.uploads_dir, "Failed to create uploads dir");
    }

    let services = AppServices::new(
        Arc::new(SqlxUserRepository::new(pool.clone())),
        Arc::new(SqlxTweetRepository::new(pool.clone())),
        Arc::new(FsImageStorage::new(&cfg.uploads_dir)),
        SessionKeys::new(&cfg.jwt_secret, cfg.session_ttl_secs),
    );
    let ctx = AppContext::new(cfg.clone(), services);
    let app = build_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = ?e, "ctrl_c_handler_failed");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = ?e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
