//! Command implementations for the CLI
//!
//! - estimate: Run a cost simulation and print the report
//! - catalog: List tariffs, patterns and task types
//! - config: Show or validate the effective configuration

pub mod catalog;
pub mod config;
pub mod estimate;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// Empty report table with the shared preset and wrapping
pub(crate) fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format a count with thousands separators, rounded to a whole number
pub(crate) fn format_number(n: f64) -> String {
    let rounded = n.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Format a dollar amount with cents
pub(crate) fn format_usd(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, format_number((cents / 100) as f64), cents % 100)
}
