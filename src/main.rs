use std::process::ExitCode;

use tracing::{error, info};

use dreamecho::{Config, WebServer};

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
    if let Err(e) = dreamecho::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        dreamecho::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("DreamEcho Backend v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );
    info!("Endpoints:");
    info!("  POST   /api/login");
    info!("  GET    /api/feed?url=<feed url>");
    info!("  GET    /api/feed/<feed url>");
    info!("  GET    /api/proxy/audio?url=<audio url>");
    info!("  GET    /api/profile (bearer token)");
    info!("  GET    /api/subscriptions (bearer token)");
    info!("  POST   /api/subscriptions (bearer token)");
    info!("  DELETE /api/subscriptions/<feed url> (bearer token)");
    info!("  GET    /api/health");

    let server = match WebServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
