use log::info;
use lumina_core::{init_logging, open_db};
use lumina_server::{build_app_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;

    // --- Logging ---
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }
    info!(
        "event=server_config module=server status=ok port={} timeout_secs={}",
        config.port, config.request_timeout_secs
    );

    // --- Database ---
    let conn = open_db(&config.db_path)?;
    let state = AppState::new(conn, config.clone());
    let seeded = state.run(|store| store.seed()).await?;
    info!("event=seed module=server status=ok created={seeded}");

    // --- Start server ---
    let app = build_app_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        "event=server_start module=server status=ok addr={}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

/// Wait for Ctrl-C or SIGTERM to start graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("event=shutdown_signal module=server status=ok");
}
