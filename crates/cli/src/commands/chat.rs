//! `dormline chat` — One-shot orchestration from the terminal.

use std::sync::Arc;

use dormline_config::{AppConfig, Strategy};
use dormline_core::message::Message;
use dormline_core::orchestrator::OrchestrationContext;
use dormline_providers::GeminiGenerator;

pub async fn run(
    message: String,
    strategy_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(raw) = strategy_override {
        config.strategy = match raw.trim().to_lowercase().as_str() {
            "router" => Strategy::Router,
            "synthesizer" | "synth" => Strategy::Synthesizer,
            other => return Err(format!("unknown strategy '{other}'").into()),
        };
    }

    let generator = Arc::new(GeminiGenerator::from_config(&config)?);
    let orchestrator = dormline_orchestrator::build_orchestrator(config.strategy, generator);

    let messages = vec![Message::user(message)];
    let decision = orchestrator
        .orchestrate(&messages, &OrchestrationContext::default())
        .await?;

    println!("[{} — {}]", decision.persona, decision.rationale);
    if let Some(contributors) = &decision.contributors {
        let names: Vec<&str> = contributors.iter().map(|p| p.as_str()).collect();
        println!("[blended from: {}]", names.join(", "));
    }
    println!("{}", decision.text);

    Ok(())
}
