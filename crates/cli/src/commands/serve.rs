//! `prospecto serve` — Start the HTTP gateway server.

use std::path::Path;

use prospecto_config::AppConfig;
use tracing::info;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config =
        AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.server.port = port;
    }

    println!("🎓 Prospecto Gateway");
    println!("   Listening: {}:{}", config.server.host, config.server.port);
    println!("   Adapter:   {}", config.delivery.adapter);

    info!(adapter = %config.delivery.adapter, "Starting gateway");

    prospecto_gateway::start(config).await?;

    Ok(())
}
