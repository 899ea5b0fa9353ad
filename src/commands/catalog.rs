use comfy_table::{Cell, Color};

use callcenter_cost::catalog::{PricingCatalog, SpeechTariff};
use callcenter_cost::distribution::{DistributionPattern, PatternRole};
use callcenter_cost::tokens::TaskPolicy;

use super::{format_number, format_usd, new_table};

/// Execute the models command
///
/// Lists every tariff in the built-in pricing catalog
pub fn models() {
    let catalog = PricingCatalog::builtin();
    println!("Pricing Catalog ({})", catalog.version);
    println!("========================\n");

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("LANGUAGE MODEL").fg(Color::Cyan),
        Cell::new("INPUT / 1M").fg(Color::Cyan),
        Cell::new("OUTPUT / 1M").fg(Color::Cyan),
        Cell::new("PTU / HOUR").fg(Color::Cyan),
    ]);
    for model in &catalog.language_models {
        table.add_row(vec![
            Cell::new(&model.name),
            Cell::new(format!("${}", model.input_price_per_million)),
            Cell::new(format!("${}", model.output_price_per_million)),
            Cell::new(
                model
                    .ptu_price_per_hour
                    .map(|p| format!("${}", p))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    println!("{}", table);

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("SPEECH MODEL").fg(Color::Cyan),
        Cell::new("PRICING").fg(Color::Cyan),
    ]);
    for model in &catalog.speech_models {
        table.add_row(vec![
            Cell::new(model.name()),
            Cell::new(describe_speech(model)),
        ]);
    }
    println!("{}", table);
}

fn describe_speech(tariff: &SpeechTariff) -> String {
    match tariff {
        SpeechTariff::FlatRate {
            price_per_million_characters,
            ..
        } => format!("${} per 1M characters", price_per_million_characters),
        SpeechTariff::TieredHourly { tiers, .. } => tiers
            .iter()
            .map(|tier| {
                format!(
                    "up to {} h: {} + ${}/h overage",
                    format_number(tier.hours_ceiling),
                    format_usd(tier.base_price),
                    tier.overage_rate_per_hour
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Execute the patterns command
///
/// Lists distribution patterns and task types with their keys
pub fn patterns() {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("PATTERN").fg(Color::Cyan),
        Cell::new("DESCRIPTION").fg(Color::Cyan),
        Cell::new("USED FOR").fg(Color::Cyan),
    ]);
    for pattern in DistributionPattern::ALL {
        let role = match pattern.role() {
            PatternRole::CallVolume => "call volume",
            PatternRole::Duration => "call duration",
            PatternRole::Both => "call volume, call duration",
        };
        table.add_row(vec![
            Cell::new(pattern.key()),
            Cell::new(pattern.label()),
            Cell::new(role),
        ]);
    }
    println!("{}", table);

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("TASK").fg(Color::Cyan),
        Cell::new("DESCRIPTION").fg(Color::Cyan),
        Cell::new("OUTPUT").fg(Color::Cyan),
    ]);
    for key in TaskPolicy::KEYS {
        // Interval shown for the real-time task is the default of one minute
        if let Ok(task) = TaskPolicy::from_key(key, 1.0) {
            table.add_row(vec![
                Cell::new(key),
                Cell::new(task.label()),
                Cell::new(task.output_rule()),
            ]);
        }
    }
    println!("{}", table);
}
