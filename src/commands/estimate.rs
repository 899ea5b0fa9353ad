use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{Cell, Color};
use serde_json::json;
use std::path::Path;
use tracing::info;

use callcenter_cost::catalog::PricingCatalog;
use callcenter_cost::config::{self, EstimatorConfig};
use callcenter_cost::cost::{CostResult, SpeechCharge};
use callcenter_cost::error::error_type_name;
use callcenter_cost::simulation::{compute_cost, SimulationInput};

use super::{format_number, format_usd, new_table};
use crate::cli::EstimateArgs;

/// Execute the estimate command
///
/// Loads configuration, applies command-line overrides and prints the report
pub fn execute(config_path: Option<&Path>, args: &EstimateArgs) -> Result<()> {
    let outcome = simulate(config_path, args);

    if args.json {
        let value = match &outcome {
            Ok((_, result)) => serde_json::to_value(result).context("Failed to serialize result")?,
            Err(err) => json!({
                "error": {
                    "type": error_type_name(err),
                    "message": err.to_string(),
                }
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return outcome.map(|_| ()).map_err(Into::into);
    }

    let (input, result) = outcome?;
    display_summary(&input, &result);
    if args.hourly {
        display_hourly(&input, &result);
    }
    if args.explain {
        display_explanation(&input, &result);
    }

    Ok(())
}

/// Resolve the effective input and run one simulated day
fn simulate(
    config_path: Option<&Path>,
    args: &EstimateArgs,
) -> callcenter_cost::error::Result<(SimulationInput, CostResult)> {
    info!("Loading configuration");
    let mut cfg = config::load_config(config_path)?;
    apply_overrides(&mut cfg, args);

    // Overridden values are checked by the engine, which reports argument errors
    let input = cfg.to_simulation_input(PricingCatalog::builtin())?;

    let result = compute_cost(&input)?;
    info!(daily_cost = result.daily_cost, "Estimate completed");
    Ok((input, result))
}

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(cfg: &mut EstimatorConfig, args: &EstimateArgs) {
    if let Some(calls) = args.calls {
        cfg.calls.total_daily = calls;
    }
    if let Some(duration) = args.duration {
        cfg.calls.avg_duration_minutes = duration;
    }
    if let Some(context) = args.context_tokens {
        cfg.calls.context_tokens = context;
    }

    let calls = &mut cfg.distribution.calls;
    if let Some(pattern) = &args.call_pattern {
        calls.pattern = pattern.clone();
    }
    if let Some(peak) = args.call_peak {
        calls.peak_factor = peak;
    }
    if let Some(shift) = args.call_shift {
        calls.time_shift_hours = shift;
    }

    let durations = &mut cfg.distribution.durations;
    if let Some(pattern) = &args.duration_pattern {
        durations.pattern = pattern.clone();
    }
    if let Some(peak) = args.duration_peak {
        durations.peak_factor = peak;
    }
    if let Some(shift) = args.duration_shift {
        durations.time_shift_hours = shift;
    }

    if let Some(task) = &args.task {
        cfg.task.task_type = task.clone();
    }
    if let Some(interval) = args.interval {
        cfg.task.realtime_interval_minutes = interval;
    }
    if let Some(model) = &args.model {
        cfg.models.language_model = model.clone();
    }
    if let Some(speech) = &args.speech_model {
        cfg.models.speech_model = speech.clone();
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
}

/// Display the cost summary section
fn display_summary(input: &SimulationInput, result: &CostResult) {
    println!("{}", "Call Center Cost Estimate".bold());
    println!("=========================\n");

    println!(
        "  Calls:          {} per day, {} min average",
        format_number(input.total_daily_calls),
        input.avg_call_duration_minutes
    );
    println!("  Task:           {}", input.task.label());
    println!("  Model:          {}", input.language_model.name);
    println!("  Speech Model:   {}", input.speech_model.name());
    println!();

    let mut usage = new_table();
    usage.set_header(vec![
        Cell::new("USAGE").fg(Color::Cyan),
        Cell::new("PER DAY").fg(Color::Cyan),
    ]);
    usage.add_row(vec![
        Cell::new("Input tokens"),
        Cell::new(format_number(result.total_input_tokens)),
    ]);
    usage.add_row(vec![
        Cell::new("Output tokens"),
        Cell::new(format_number(result.total_output_tokens)),
    ]);
    usage.add_row(vec![
        Cell::new("Total tokens"),
        Cell::new(format_number(result.total_tokens)),
    ]);
    usage.add_row(vec![
        Cell::new("Speech hours"),
        Cell::new(format!("{:.2}", result.total_hours_used)),
    ]);
    usage.add_row(vec![
        Cell::new("Transcript characters"),
        Cell::new(format_number(result.total_characters)),
    ]);
    println!("{}", usage);

    let mut costs = new_table();
    costs.set_header(vec![
        Cell::new("COST").fg(Color::Cyan),
        Cell::new("AMOUNT").fg(Color::Cyan),
    ]);
    costs.add_row(vec![
        Cell::new("Model input"),
        Cell::new(format_usd(result.language_model_breakdown.input_cost)),
    ]);
    costs.add_row(vec![
        Cell::new("Model output"),
        Cell::new(format_usd(result.language_model_breakdown.output_cost)),
    ]);
    costs.add_row(vec![
        Cell::new("Speech"),
        Cell::new(format_usd(result.speech_cost)),
    ]);
    costs.add_row(vec![
        Cell::new("Daily").fg(Color::Green),
        Cell::new(format_usd(result.daily_cost)).fg(Color::Green),
    ]);
    costs.add_row(vec![
        Cell::new("Monthly (30 days)"),
        Cell::new(format_usd(result.monthly_cost)),
    ]);
    costs.add_row(vec![
        Cell::new("Yearly (365 days)"),
        Cell::new(format_usd(result.yearly_cost)),
    ]);
    println!("{}", costs);
}

/// Display usage per hour of the day
fn display_hourly(input: &SimulationInput, result: &CostResult) {
    println!("\n{}", "Hourly Breakdown".bold());

    let mut table = new_table();
    let usage_header = if input.speech_model.is_tiered() {
        "STT HOURS"
    } else {
        "TOKENS"
    };
    table.set_header(vec![
        Cell::new("HOUR").fg(Color::Cyan),
        Cell::new("CALLS").fg(Color::Cyan),
        Cell::new("AVG MIN").fg(Color::Cyan),
        Cell::new(usage_header).fg(Color::Cyan),
    ]);

    for row in &result.hourly_breakdown {
        let usage = if input.speech_model.is_tiered() {
            format!("{:.2}", row.hours_used)
        } else {
            format_number(row.total_tokens)
        };
        table.add_row(vec![
            Cell::new(format!("{:02}:00", row.hour)),
            Cell::new(format_number(row.calls)),
            Cell::new(format!("{:.2}", row.duration_minutes)),
            Cell::new(usage),
        ]);
    }

    println!("{}", table);
}

/// Display the derivation of each figure
fn display_explanation(input: &SimulationInput, result: &CostResult) {
    let rate = &input.speech_rate;
    println!("\n{}", "Calculation Explanation".bold());

    if let Some(per_call) = result.tokens_per_average_call {
        println!("{}", "Tokens per average call:".cyan().bold());
        println!(
            "  Input  = ceil({} min * {} words/min * {} tokens/word) + {} context = {}",
            input.avg_call_duration_minutes,
            rate.words_per_minute,
            rate.tokens_per_word,
            input.context_tokens,
            format_number(per_call.input_tokens as f64)
        );
        println!(
            "  Output = {} ({})",
            format_number(per_call.output_tokens as f64),
            input.task.output_rule()
        );
        println!();
    }

    println!("{}", "Language model:".cyan().bold());
    println!(
        "  Input  = {} tokens * ${} / 1M = {}",
        format_number(result.total_input_tokens),
        input.language_model.input_price_per_million,
        format_usd(result.language_model_breakdown.input_cost)
    );
    println!(
        "  Output = {} tokens * ${} / 1M = {}",
        format_number(result.total_output_tokens),
        input.language_model.output_price_per_million,
        format_usd(result.language_model_breakdown.output_cost)
    );
    println!();

    println!("{}", "Speech:".cyan().bold());
    match result.speech_charge {
        SpeechCharge::FlatRate {
            million_characters,
            price_per_million_characters,
        } => {
            println!(
                "  {:.4}M characters * ${} / 1M = {}",
                million_characters,
                price_per_million_characters,
                format_usd(result.speech_cost)
            );
        }
        SpeechCharge::Tiered {
            tier,
            overage_hours,
        } => {
            println!("  Hours used:    {:.2}", result.total_hours_used);
            println!(
                "  Selected tier: {} hours at {}",
                format_number(tier.hours_ceiling),
                format_usd(tier.base_price)
            );
            println!(
                "  Overage:       {:.2} hours * ${} = {}",
                overage_hours,
                tier.overage_rate_per_hour,
                format_usd(overage_hours * tier.overage_rate_per_hour)
            );
        }
    }
    println!();

    println!(
        "{} {} + {} = {}",
        "Daily:".green().bold(),
        format_usd(result.language_model_cost),
        format_usd(result.speech_cost),
        format_usd(result.daily_cost)
    );
}
