//! End-to-end simulation entry point
//!
//! A [`SimulationInput`] is an immutable snapshot of every user-chosen
//! parameter. Each call to [`compute_cost`] regenerates both hourly
//! profiles and prices them from scratch.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{LanguageModelTariff, SpeechTariff};
use crate::cost::{CostCalculator, CostResult};
use crate::distribution::{
    generate_distribution_with_rng, DistributionPattern, DistributionShape, HourlyProfile,
    DEFAULT_SEED, HOURS_PER_DAY,
};
use crate::error::{EstimatorError, Result};
use crate::tokens::{TaskPolicy, TokenEstimator};

/// Every parameter of one cost simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub total_daily_calls: f64,
    pub avg_call_duration_minutes: f64,
    pub context_tokens: u64,
    pub call_pattern: DistributionShape,
    pub duration_pattern: DistributionShape,
    pub task: TaskPolicy,
    pub language_model: LanguageModelTariff,
    pub speech_model: SpeechTariff,
    #[serde(default)]
    pub speech_rate: TokenEstimator,
    /// Seed for the random duration/volume pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationInput {
    /// Uniform traffic, summarization, no prompt context
    pub fn new(
        total_daily_calls: f64,
        avg_call_duration_minutes: f64,
        language_model: LanguageModelTariff,
        speech_model: SpeechTariff,
    ) -> Self {
        Self {
            total_daily_calls,
            avg_call_duration_minutes,
            context_tokens: 0,
            call_pattern: DistributionShape::uniform(),
            duration_pattern: DistributionShape::uniform(),
            task: TaskPolicy::default(),
            language_model,
            speech_model,
            speech_rate: TokenEstimator::default(),
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.total_daily_calls.is_finite() || self.total_daily_calls < 0.0 {
            return Err(EstimatorError::invalid(format!(
                "total daily calls must be non-negative, got {}",
                self.total_daily_calls
            )));
        }
        if !self.avg_call_duration_minutes.is_finite() || self.avg_call_duration_minutes < 0.0 {
            return Err(EstimatorError::invalid(format!(
                "average call duration must be non-negative, got {}",
                self.avg_call_duration_minutes
            )));
        }
        TokenEstimator::new(self.speech_rate.words_per_minute, self.speech_rate.tokens_per_word)?;
        self.task.validate()
    }

    /// Call-volume and duration profiles, drawing random factors from `rng`
    ///
    /// The call profile is drawn first.
    pub fn profiles_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(HourlyProfile, HourlyProfile)> {
        self.validate()?;
        let calls = generate_distribution_with_rng(
            &self.call_pattern,
            self.total_daily_calls / HOURS_PER_DAY as f64,
            rng,
        )?;
        let durations = generate_distribution_with_rng(
            &self.duration_pattern,
            self.avg_call_duration_minutes,
            rng,
        )?;
        Ok((calls, durations))
    }

    /// Profiles drawn from a generator seeded with `seed` (or the default seed)
    pub fn profiles(&self) -> Result<(HourlyProfile, HourlyProfile)> {
        self.profiles_with_rng(&mut self.seeded_rng())
    }

    /// Whether a random pattern will draw from [`DEFAULT_SEED`]
    pub fn uses_default_seed(&self) -> bool {
        self.seed.is_none()
            && [self.call_pattern.pattern, self.duration_pattern.pattern]
                .contains(&DistributionPattern::RandomVariable)
    }

    fn seeded_rng(&self) -> StdRng {
        if self.uses_default_seed() {
            warn!(seed = DEFAULT_SEED, "Random distribution generated with the default seed");
        }
        StdRng::seed_from_u64(self.seed.unwrap_or(DEFAULT_SEED))
    }
}

/// Compute the cost of one simulated day
///
/// Deterministic: random patterns draw from a generator seeded with the
/// input's seed, or a fixed default.
pub fn compute_cost(input: &SimulationInput) -> Result<CostResult> {
    compute_cost_with_rng(input, &mut input.seeded_rng())
}

/// Compute the cost of one simulated day with a caller-supplied generator
pub fn compute_cost_with_rng<R: Rng + ?Sized>(
    input: &SimulationInput,
    rng: &mut R,
) -> Result<CostResult> {
    let (call_profile, duration_profile) = input.profiles_with_rng(rng)?;
    debug!(
        total_daily_calls = input.total_daily_calls,
        call_pattern = %input.call_pattern.pattern,
        duration_pattern = %input.duration_pattern.pattern,
        "Generated simulation profiles"
    );

    let calculator = CostCalculator::new(input.speech_rate);
    let mut result = calculator.compute(
        &call_profile,
        &duration_profile,
        &input.language_model,
        &input.speech_model,
        &input.task,
        input.context_tokens,
    )?;

    result.tokens_per_average_call = Some(calculator.estimator().estimate(
        input.avg_call_duration_minutes,
        &input.task,
        input.context_tokens,
    )?);

    Ok(result)
}
