use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use callcenter_cost::catalog::PricingCatalog;
use callcenter_cost::config;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration (defaults, file and environment merged)
pub fn show(path: Option<&Path>) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();

    // Serialize to TOML format
    println!("{}", cfg.to_toml()?);

    info!("Configuration displayed successfully");
    Ok(())
}

/// Execute the config validate command
///
/// Validates the configuration file and resolves its model names
pub fn validate(path: Option<&Path>) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    let cfg = config::load_config(path)?;
    let input = cfg.to_simulation_input(PricingCatalog::builtin())?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  Calls: {} per day, {} min average",
        input.total_daily_calls, input.avg_call_duration_minutes
    );
    println!(
        "  Patterns: calls={} durations={}",
        input.call_pattern.pattern, input.duration_pattern.pattern
    );
    println!("  Task: {}", input.task.label());
    println!("  Language Model: {}", input.language_model.name);
    println!("  Speech Model: {}", input.speech_model.name());

    info!("Configuration validation successful");
    Ok(())
}
