//! `dormline doctor` — Diagnose configuration health.

use dormline_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Dormline Doctor — Configuration Diagnostics");
    println!("===========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!(
            "  ⚠️  No config file at {} — running on defaults",
            config_path.display()
        );
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            println!("     strategy: {:?}", config.strategy);
            println!("     model:    {}", config.model);

            if config.api_key.is_some() {
                println!("  ✅ Gemini API key configured");
            } else {
                println!("  ❌ No API key — set GEMINI_API_KEY or add api_key to config.toml");
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("All checks passed.");
    } else {
        println!("{issues} issue(s) found.");
    }

    Ok(())
}
