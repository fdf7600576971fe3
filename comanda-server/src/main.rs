use comanda_server::{Config, Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment: .env + logging (guard must outlive the server)
    let _log_guard = setup_environment()?;

    print_banner();
    tracing::info!("Comanda server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. + 4. State initialization and HTTP serving
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(e);
    }

    Ok(())
}
