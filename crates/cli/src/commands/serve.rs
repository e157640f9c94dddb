//! `dormline serve` — Start the HTTP gateway.

use std::sync::Arc;

use dormline_config::AppConfig;
use dormline_providers::GeminiGenerator;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let generator = Arc::new(GeminiGenerator::from_config(&config)?);
    let orchestrator = dormline_orchestrator::build_orchestrator(config.strategy, generator);

    println!("Dormline Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Strategy:  {}", orchestrator.name());
    println!("   Model:     {}", config.model);

    dormline_gateway::start(&config.gateway, orchestrator).await?;

    Ok(())
}
