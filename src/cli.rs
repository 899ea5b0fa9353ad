use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "callcenter-cost", version, about = "AI call center cost estimator")]
pub struct Cli {
    /// Configuration file path (defaults to ./callcenter.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Estimate daily, monthly and yearly cost (default)
    Estimate(EstimateArgs),

    /// List language model and speech tariffs
    Models,

    /// List distribution patterns and task types
    Patterns,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

/// Overrides applied on top of the loaded configuration
#[derive(Args, Debug, Clone, Default)]
pub struct EstimateArgs {
    /// Total calls per day
    #[arg(long)]
    pub calls: Option<f64>,

    /// Average call duration in minutes
    #[arg(long)]
    pub duration: Option<f64>,

    /// Prompt context tokens added to every call
    #[arg(long)]
    pub context_tokens: Option<u64>,

    /// Call volume pattern (see `patterns`)
    #[arg(long)]
    pub call_pattern: Option<String>,

    /// Peak call volume multiplier
    #[arg(long)]
    pub call_peak: Option<f64>,

    /// Call volume time shift in hours
    #[arg(long, allow_hyphen_values = true)]
    pub call_shift: Option<f64>,

    /// Call duration pattern (see `patterns`)
    #[arg(long)]
    pub duration_pattern: Option<String>,

    /// Peak duration multiplier
    #[arg(long)]
    pub duration_peak: Option<f64>,

    /// Duration time shift in hours
    #[arg(long, allow_hyphen_values = true)]
    pub duration_shift: Option<f64>,

    /// Task type: summarization, sentiment, realTimeSentiment, complexAnalysis
    #[arg(short, long)]
    pub task: Option<String>,

    /// Real-time sentiment interval in minutes
    #[arg(long)]
    pub interval: Option<f64>,

    /// Language model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Speech model name
    #[arg(short, long)]
    pub speech_model: Option<String>,

    /// Seed for the variable pattern
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the hour-by-hour breakdown
    #[arg(long)]
    pub hourly: bool,

    /// Show how each figure was calculated
    #[arg(long)]
    pub explain: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration as TOML
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Estimate if none provided
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Estimate(EstimateArgs::default()))
    }
}
