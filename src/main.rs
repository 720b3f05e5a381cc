use missnova::config::{AppConfig, Credentials};
use missnova::database::Database;
use missnova::server::{ApiServer, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load();
    let data_dir = config.data_dir();

    let _log_guard = missnova::core::logging::init(&data_dir);
    log::info!("{} v{} starting", missnova::NAME, missnova::VERSION);

    let credentials = Credentials::from_env();
    log::debug!("Credentials: {:?}", credentials);

    let db = Database::new(&data_dir).await?;
    let state = AppState::from_config(db, &config, &credentials);

    let server = ApiServer::new(config.bind_addr(), state);
    server
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    log::info!("{} stopped", missnova::NAME);
    Ok(())
}
