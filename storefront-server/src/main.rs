use storefront_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, work dir, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    storefront_server::init_logger_with_file(
        std::env::var("RUST_LOG").ok().as_deref(),
        config.log_dir().to_str(),
    );

    print_banner();
    tracing::info!("Storefront server starting...");

    // 2. Initialize server state (database + service graph)
    let state = ServerState::initialize(&config).await?;

    // 3. Run the HTTP server until shutdown
    let server = Server::with_state(config, state);
    server.run().await?;

    Ok(())
}
