use std::net::SocketAddr;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use musicrev_api::bootstrap::ensure_admin;
use musicrev_api::config::ServerConfig;
use musicrev_api::router::build_app_router;
use musicrev_api::state::AppState;
use musicrev_db::DbPool;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        media_root = %config.media_root.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );

    let pool = prepare_database().await;

    if let Some(admin) = &config.bootstrap_admin {
        ensure_admin(&pool, admin)
            .await
            .unwrap_or_else(|e| panic!("Could not provision admin '{}': {e}", admin.username));
    }

    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .unwrap_or_else(|e| panic!("HOST '{}' is not an IP address: {e}", config.host)),
        config.port,
    );

    let state = AppState::new(pool, config.clone());
    state
        .media
        .prepare()
        .await
        .unwrap_or_else(|e| panic!("Could not create media directory: {e}"));

    let app = build_app_router(state, &config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Could not bind {addr}: {e}"));
    tracing::info!(%addr, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server stopped with an error");
    }
    tracing::info!("Shut down");
}

/// `RUST_LOG` wins; otherwise debug for this crate and tower-http.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("musicrev_api=debug,musicrev_db=info,tower_http=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, check reachability, and apply pending migrations.
async fn prepare_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = musicrev_db::create_pool(&url)
        .await
        .unwrap_or_else(|e| panic!("Could not connect to the database: {e}"));

    musicrev_db::health_check(&pool)
        .await
        .unwrap_or_else(|e| panic!("Database is not answering: {e}"));
    musicrev_db::run_migrations(&pool)
        .await
        .unwrap_or_else(|e| panic!("Migrations failed: {e}"));
    tracing::info!("Database ready");

    pool
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Interrupted, draining connections"),
        () = terminate => tracing::info!("Terminated, draining connections"),
    }
}
