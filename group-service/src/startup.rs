//! Application startup and lifecycle management.

use std::net::SocketAddr;

use service_core::error::AppError;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::GroupConfig;
use crate::services::GraphService;
use crate::{AppState, build_router};

/// Container that owns the bound listener and the router. Binding happens in
/// `build` (port 0 picks a free port, which tests rely on); serving happens
/// in `run_until_stopped`.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: axum::Router,
}

impl Application {
    pub async fn build(config: GroupConfig) -> Result<Self, AppError> {
        let graph = GraphService::new(&config.azure)?;
        tracing::info!(tenant_id = %config.azure.tenant_id, "Directory client initialized");

        let state = AppState {
            config: config.clone(),
            graph,
        };
        let router = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGTERM/Ctrl+C.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
