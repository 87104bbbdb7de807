/// Server bootstrap: bind, serve, shut down on signal
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::controller::PingController;
use crate::core::network::HttpPeerClient;
use crate::error::GameError;
use crate::server::routes::create_router;

/// Run one instance until Ctrl-C or SIGTERM.
pub async fn serve(config: &ServerConfig) -> Result<(), GameError> {
    let peer_client = HttpPeerClient::new(config.ping_timeout())?;
    let controller = PingController::new(config.default_delay_ms, Arc::new(peer_client));

    let listener = TcpListener::bind(config.bind).await?;
    info!("Ping-pong instance listening on {}", listener.local_addr()?);
    info!("Available endpoints:");
    info!("  POST /start/:delay?instance_url_param=<peer>");
    info!("  POST /pause | /resume | /stop");
    info!("  GET  /ping");

    axum::serve(listener, create_router(controller))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Instance stopped");
    Ok(())
}

/// Serve `controller` on an already bound listener in the background.
pub fn spawn(
    listener: TcpListener,
    controller: PingController,
) -> Result<(SocketAddr, JoinHandle<std::io::Result<()>>), GameError> {
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        axum::serve(listener, create_router(controller)).await
    });
    Ok((addr, handle))
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
    info!("Shutdown signal received");
}
