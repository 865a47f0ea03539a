use storefront_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env, logging)
    let config = setup_environment()?;

    print_banner();

    tracing::info!(
        "Storefront server starting (env: {}, store: {})",
        config.environment,
        config.store_path
    );

    // 2. Shared state (store, catalog, admin account, JWT)
    let state = ServerState::initialize(&config)?;

    // 3. HTTP server with graceful shutdown
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
