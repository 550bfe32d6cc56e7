use portal_api::{
    config::Config,
    create_app,
    logging::{init_logging, log_server_ready, log_shutdown, log_startup_info},
    AppState,
};
use std::net::SocketAddr;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = Config::from_env()?;
    log_startup_info(&config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let app_state = AppState::from_config(config).await?;

    tracing::info!("Building routes...");
    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log_server_ready(&addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    log_shutdown();
    result.map_err(Into::into)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
}
