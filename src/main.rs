use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use callcenter_cost::init_tracing;

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    init_tracing(args.log_format == cli::LogFormat::Json);

    let config_path = args.config.as_deref();

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Estimate(estimate_args) => {
            commands::estimate::execute(config_path, &estimate_args)?;
        }
        cli::Commands::Models => {
            commands::catalog::models();
        }
        cli::Commands::Patterns => {
            commands::catalog::patterns();
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(config_path)?,
            cli::ConfigCommands::Validate => commands::config::validate(config_path)?,
        },
        cli::Commands::Version => {
            println!("Call Center Cost Estimator v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "Pricing catalog {}",
                callcenter_cost::catalog::CATALOG_VERSION
            );
        }
    }

    Ok(())
}
