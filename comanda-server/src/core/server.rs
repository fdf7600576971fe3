//! HTTP server lifecycle

use std::net::SocketAddr;

use tracing::info;

use crate::core::{Config, ServerState};

pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Initialize state, build the router and serve until ctrl-c
    pub async fn run(self) -> anyhow::Result<()> {
        let (state, socket_layer) = ServerState::initialize(&self.config).await?;
        let app = crate::api::build_router(state, socket_layer);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, environment = %self.config.environment, "Server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, draining connections");
}
