//! cryptometrics API server
//!
//! Stateless: every request fetches its own candles, so instances can be
//! scaled horizontally.

use cryptometrics::config::Config;
use cryptometrics::core::http::start_server;
use cryptometrics::logging;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env();
    info!(
        service = %config.service_name,
        version = %config.version,
        environment = %config.environment,
        "Starting cryptometrics API server"
    );
    info!(
        "HTTP Server: http://{}:{}{}",
        config.host, config.port, config.prefix_path
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
