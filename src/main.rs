use std::process::ExitCode;

use tracing::{error, info};

use gallery::{Config, Database, UploadStorage, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = gallery::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        gallery::logging::init_console_only(&config.logging.level);
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> gallery::Result<()> {
    config.validate()?;

    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let db = Database::open(&config.database.path).await?;
    info!("Database opened at {}", config.database.path);

    let storage = UploadStorage::new(
        &config.uploads.directory,
        &config.uploads.allowed_extensions,
    )?;
    info!("Upload storage at {}", config.uploads.directory);

    let db = std::sync::Arc::new(db);
    let server = WebServer::new(
        &config.server,
        db.clone(),
        storage,
        config.uploads.max_upload_bytes(),
    )?;
    server.run().await?;

    db.close().await;
    info!("Database closed");
    Ok(())
}
