//! Daily cost aggregation over an hourly load profile
//!
//! Walks the 24 hourly buckets, accumulates token, hour and character
//! totals, then prices them against the selected language model and
//! speech tariffs.

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{LanguageModelTariff, SpeechTariff, SpeechTier};
use crate::distribution::{HourlyProfile, HOURS_PER_DAY};
use crate::error::{EstimatorError, Result};
use crate::tokens::{TaskPolicy, TokenEstimate, TokenEstimator};

pub const DAYS_PER_MONTH: f64 = 30.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Transcript characters per spoken word
pub const CHARACTERS_PER_WORD: f64 = 5.0;

const PER_MILLION: f64 = 1_000_000.0;

/// Language model cost split by direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

impl CostBreakdown {
    /// Create a zero-cost breakdown
    pub fn zero() -> Self {
        Self::default()
    }

    /// Calculate total cost from components
    pub fn calculate_total(&mut self) {
        self.total_cost = self.input_cost + self.output_cost;
    }
}

/// How the speech cost was derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeechCharge {
    FlatRate {
        million_characters: f64,
        price_per_million_characters: f64,
    },
    Tiered {
        tier: SpeechTier,
        overage_hours: f64,
    },
}

/// Usage for one hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyUsage {
    pub hour: usize,
    pub calls: f64,
    pub duration_minutes: f64,
    pub hours_used: f64,
    pub input_tokens: f64,
    pub output_tokens: f64,
    pub total_tokens: f64,
}

/// Projected spend and usage for one simulated day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostResult {
    pub daily_cost: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    pub total_input_tokens: f64,
    pub total_output_tokens: f64,
    pub total_tokens: f64,
    pub total_hours_used: f64,
    pub total_characters: f64,
    pub language_model_cost: f64,
    pub language_model_breakdown: CostBreakdown,
    pub speech_cost: f64,
    pub speech_charge: SpeechCharge,
    pub hourly_breakdown: Vec<HourlyUsage>,
    /// Token estimate for one call of average length, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_per_average_call: Option<TokenEstimate>,
}

/// Price token totals against a language model tariff (prices are per 1M tokens)
pub fn price_language_model(
    model: &LanguageModelTariff,
    input_tokens: f64,
    output_tokens: f64,
) -> CostBreakdown {
    let mut breakdown = CostBreakdown {
        input_cost: input_tokens * model.input_price_per_million / PER_MILLION,
        output_cost: output_tokens * model.output_price_per_million / PER_MILLION,
        total_cost: 0.0,
    };
    breakdown.calculate_total();
    breakdown
}

/// Price a day's speech usage
///
/// Tiered tariffs bill the whole day against a single tier (the first one
/// covering `hours_used`, else the overflow tier); lower tiers are never
/// partially applied.
pub fn price_speech(
    tariff: &SpeechTariff,
    hours_used: f64,
    characters: f64,
) -> Result<(f64, SpeechCharge)> {
    tariff.validate()?;

    match tariff {
        SpeechTariff::FlatRate {
            price_per_million_characters,
            ..
        } => {
            let million_characters = characters / PER_MILLION;
            Ok((
                million_characters * price_per_million_characters,
                SpeechCharge::FlatRate {
                    million_characters,
                    price_per_million_characters: *price_per_million_characters,
                },
            ))
        }
        SpeechTariff::TieredHourly { name, .. } => {
            let tier = *tariff.select_tier(hours_used).ok_or_else(|| {
                EstimatorError::ConfigError(format!("Speech tariff '{}' has no tiers", name))
            })?;

            let overage_hours = (hours_used - tier.hours_ceiling).max(0.0);
            if overage_hours > 0.0 {
                warn!(
                    tariff = %name,
                    hours_used,
                    ceiling = tier.hours_ceiling,
                    "Speech usage exceeds every tier, billing overage"
                );
            }

            Ok((
                tier.base_price + overage_hours * tier.overage_rate_per_hour,
                SpeechCharge::Tiered {
                    tier,
                    overage_hours,
                },
            ))
        }
    }
}

/// Calculator for a day's cost from hourly call and duration profiles
#[derive(Debug, Clone, Copy, Default)]
pub struct CostCalculator {
    estimator: TokenEstimator,
}

impl CostCalculator {
    /// Create a new cost calculator
    pub fn new(estimator: TokenEstimator) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    /// Compute the cost of one day of traffic
    ///
    /// # Arguments
    /// * `call_profile` - Calls per hour
    /// * `duration_profile` - Average call duration (minutes) per hour
    /// * `language_model` / `speech_model` - Tariffs to price against
    /// * `task` - Output token policy
    /// * `context_tokens` - Prompt tokens added to every call
    pub fn compute(
        &self,
        call_profile: &HourlyProfile,
        duration_profile: &HourlyProfile,
        language_model: &LanguageModelTariff,
        speech_model: &SpeechTariff,
        task: &TaskPolicy,
        context_tokens: u64,
    ) -> Result<CostResult> {
        language_model.validate()?;

        let words_per_minute = self.estimator.words_per_minute;
        let mut total_input_tokens = 0.0;
        let mut total_output_tokens = 0.0;
        let mut total_hours_used = 0.0;
        let mut total_characters = 0.0;
        let mut hourly_breakdown = Vec::with_capacity(HOURS_PER_DAY);

        for hour in 0..HOURS_PER_DAY {
            let calls = call_profile[hour];
            let duration = duration_profile[hour];
            if !calls.is_finite() || calls < 0.0 {
                return Err(EstimatorError::invalid(format!(
                    "hour {} has invalid call volume {}",
                    hour, calls
                )));
            }

            let tokens = self.estimator.estimate(duration, task, context_tokens)?;
            let input_tokens = calls * tokens.input_tokens as f64;
            let output_tokens = calls * tokens.output_tokens as f64;
            let hours_used = calls * duration / 60.0;

            total_input_tokens += input_tokens;
            total_output_tokens += output_tokens;
            total_hours_used += hours_used;
            total_characters += calls * duration * words_per_minute * CHARACTERS_PER_WORD;

            hourly_breakdown.push(HourlyUsage {
                hour,
                calls,
                duration_minutes: duration,
                hours_used,
                input_tokens,
                output_tokens,
                total_tokens: input_tokens + output_tokens,
            });
        }

        let language_model_breakdown =
            price_language_model(language_model, total_input_tokens, total_output_tokens);
        let (speech_cost, speech_charge) =
            price_speech(speech_model, total_hours_used, total_characters)?;

        let daily_cost = language_model_breakdown.total_cost + speech_cost;

        debug!(
            model = %language_model.name,
            speech_model = %speech_model.name(),
            task = %task,
            total_input_tokens,
            total_output_tokens,
            total_hours_used,
            daily_cost,
            "Computed daily cost"
        );

        Ok(CostResult {
            daily_cost,
            monthly_cost: daily_cost * DAYS_PER_MONTH,
            yearly_cost: daily_cost * DAYS_PER_YEAR,
            total_input_tokens,
            total_output_tokens,
            total_tokens: total_input_tokens + total_output_tokens,
            total_hours_used,
            total_characters,
            language_model_cost: language_model_breakdown.total_cost,
            language_model_breakdown,
            speech_cost,
            speech_charge,
            hourly_breakdown,
            tokens_per_average_call: None,
        })
    }
}
