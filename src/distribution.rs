//! Hourly load profile generation
//!
//! Builds a 24-point profile (calls per hour or average call duration per
//! hour) from a named traffic pattern, a peak factor and a time shift.
//!
//! # Algorithm
//! 1. Fill all 24 hours with the baseline value
//! 2. Shape step: multiply hours inside the pattern's peak window by the
//!    peak factor and divide the others by it (the random pattern instead
//!    multiplies every hour by a uniform draw in `[1, peak_factor]`)
//! 3. Skew step: multiply hour `h` by `1 + 0.5 * sin(2π (h + shift) / 24)`
//! 4. Renormalize so the profile sums to `baseline * 24`
//!
//! The uniform pattern skips steps 2-4 and returns the flat profile, so a
//! time shift has no effect on it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{EstimatorError, Result};

pub const HOURS_PER_DAY: usize = 24;

/// Amplitude of the sinusoidal time-of-day redistribution
const SKEW_AMPLITUDE: f64 = 0.5;

/// Seed used when the random pattern is generated without a caller-supplied generator
pub const DEFAULT_SEED: u64 = 0x5eed_ca11;

/// Named traffic shape for an hourly profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionPattern {
    #[serde(rename = "uniform")]
    Uniform,
    #[serde(rename = "normalBusiness")]
    PeakBusinessHours,
    #[serde(rename = "nightShift")]
    PeakNightHours,
    #[serde(rename = "heavyMorning")]
    HeavyMorning,
    #[serde(rename = "heavyEvening")]
    HeavyEvening,
    #[serde(rename = "shorterPeak")]
    ShorterDuringPeak,
    #[serde(rename = "longerPeak")]
    LongerDuringPeak,
    #[serde(rename = "variable")]
    RandomVariable,
}

/// Which profile a pattern is offered for in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRole {
    CallVolume,
    Duration,
    Both,
}

impl DistributionPattern {
    pub const ALL: [DistributionPattern; 8] = [
        Self::Uniform,
        Self::PeakBusinessHours,
        Self::PeakNightHours,
        Self::HeavyMorning,
        Self::HeavyEvening,
        Self::ShorterDuringPeak,
        Self::LongerDuringPeak,
        Self::RandomVariable,
    ];

    /// Short key used in config files and on the command line
    pub fn key(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::PeakBusinessHours => "normalBusiness",
            Self::PeakNightHours => "nightShift",
            Self::HeavyMorning => "heavyMorning",
            Self::HeavyEvening => "heavyEvening",
            Self::ShorterDuringPeak => "shorterPeak",
            Self::LongerDuringPeak => "longerPeak",
            Self::RandomVariable => "variable",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Uniform => "Uniform",
            Self::PeakBusinessHours => "Peak During Business Hours",
            Self::PeakNightHours => "Peak During Night Hours",
            Self::HeavyMorning => "Heavy Morning Calls",
            Self::HeavyEvening => "Heavy Evening Calls",
            Self::ShorterDuringPeak => "Shorter During Peak Hours",
            Self::LongerDuringPeak => "Longer During Peak Hours",
            Self::RandomVariable => "Variable Call Duration",
        }
    }

    pub fn role(self) -> PatternRole {
        match self {
            Self::Uniform => PatternRole::Both,
            Self::PeakBusinessHours
            | Self::PeakNightHours
            | Self::HeavyMorning
            | Self::HeavyEvening => PatternRole::CallVolume,
            Self::ShorterDuringPeak | Self::LongerDuringPeak | Self::RandomVariable => {
                PatternRole::Duration
            }
        }
    }

    /// Whether `hour` lies in the pattern's peak window
    ///
    /// Windows are half-open clock ranges; the night window wraps midnight.
    fn in_peak_window(self, hour: usize) -> bool {
        match self {
            Self::PeakBusinessHours | Self::ShorterDuringPeak | Self::LongerDuringPeak => {
                (9..17).contains(&hour)
            }
            Self::PeakNightHours => hour >= 22 || hour < 6,
            Self::HeavyMorning => (6..12).contains(&hour),
            Self::HeavyEvening => (17..23).contains(&hour),
            Self::Uniform | Self::RandomVariable => false,
        }
    }

    /// Multiplier applied by the shape step for deterministic patterns
    fn shape_multiplier(self, hour: usize, peak_factor: f64) -> f64 {
        let in_window = self.in_peak_window(hour);
        // Shorter-during-peak inverts the business window's direction
        let boost = match self {
            Self::ShorterDuringPeak => !in_window,
            _ => in_window,
        };

        if boost {
            peak_factor
        } else {
            1.0 / peak_factor
        }
    }
}

impl fmt::Display for DistributionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DistributionPattern {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                EstimatorError::invalid(format!("unknown distribution pattern '{}'", s))
            })
    }
}

/// A pattern together with its two numeric modifiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionShape {
    pub pattern: DistributionPattern,
    pub peak_factor: f64,
    pub time_shift_hours: f64,
}

impl DistributionShape {
    pub fn new(pattern: DistributionPattern, peak_factor: f64, time_shift_hours: f64) -> Self {
        Self {
            pattern,
            peak_factor,
            time_shift_hours,
        }
    }

    pub fn uniform() -> Self {
        Self::new(DistributionPattern::Uniform, 2.0, 0.0)
    }
}

impl Default for DistributionShape {
    fn default() -> Self {
        Self::uniform()
    }
}

/// 24 non-negative values indexed by hour of day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyProfile([f64; HOURS_PER_DAY]);

impl HourlyProfile {
    /// Profile with every hour set to `value`
    pub fn flat(value: f64) -> Self {
        Self([value; HOURS_PER_DAY])
    }

    /// Build a profile from explicit values, rejecting negative or non-finite entries
    pub fn from_values(values: [f64; HOURS_PER_DAY]) -> Result<Self> {
        if let Some((hour, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(EstimatorError::invalid(format!(
                "hour {} has invalid value {}",
                hour, v
            )));
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64; HOURS_PER_DAY] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Hour with the highest value (earliest hour on ties)
    pub fn peak_hour(&self) -> usize {
        let mut best = 0;
        for (hour, value) in self.0.iter().enumerate() {
            if *value > self.0[best] {
                best = hour;
            }
        }
        best
    }
}

impl Index<usize> for HourlyProfile {
    type Output = f64;

    fn index(&self, hour: usize) -> &f64 {
        &self.0[hour]
    }
}

/// Generate an hourly profile with the default seeded generator
///
/// Deterministic for every pattern: the random pattern always draws from
/// a generator seeded with [`DEFAULT_SEED`].
pub fn generate_distribution(shape: &DistributionShape, baseline: f64) -> Result<HourlyProfile> {
    if shape.pattern == DistributionPattern::RandomVariable {
        warn!("Random distribution generated with the default seed");
    }
    let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
    generate_distribution_with_rng(shape, baseline, &mut rng)
}

/// Generate an hourly profile drawing random factors from `rng`
///
/// # Arguments
/// * `shape` - Pattern, peak factor and time shift
/// * `baseline` - Value per hour before reshaping; the profile sums to `baseline * 24`
/// * `rng` - Source for the random pattern's per-hour factors (untouched otherwise)
pub fn generate_distribution_with_rng<R: Rng + ?Sized>(
    shape: &DistributionShape,
    baseline: f64,
    rng: &mut R,
) -> Result<HourlyProfile> {
    if !baseline.is_finite() || baseline < 0.0 {
        return Err(EstimatorError::invalid(format!(
            "baseline must be a non-negative number, got {}",
            baseline
        )));
    }

    let mut values = [baseline; HOURS_PER_DAY];

    if shape.pattern == DistributionPattern::Uniform {
        return Ok(HourlyProfile(values));
    }

    let peak_factor = shape.peak_factor;
    if !peak_factor.is_finite() || peak_factor <= 0.0 {
        return Err(EstimatorError::invalid(format!(
            "peak factor must be positive, got {}",
            peak_factor
        )));
    }
    if !shape.time_shift_hours.is_finite() {
        return Err(EstimatorError::invalid(format!(
            "time shift must be finite, got {}",
            shape.time_shift_hours
        )));
    }

    // Shape step
    for (hour, value) in values.iter_mut().enumerate() {
        let multiplier = match shape.pattern {
            DistributionPattern::RandomVariable => 1.0 + rng.gen::<f64>() * (peak_factor - 1.0),
            pattern => pattern.shape_multiplier(hour, peak_factor),
        };
        *value *= multiplier;
    }

    // Skew step
    for (hour, value) in values.iter_mut().enumerate() {
        let phase = 2.0 * PI * (hour as f64 + shape.time_shift_hours) / HOURS_PER_DAY as f64;
        *value *= 1.0 + SKEW_AMPLITUDE * phase.sin();
    }

    // Renormalize to the baseline daily total
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        let target = baseline * HOURS_PER_DAY as f64;
        for value in values.iter_mut() {
            *value = *value / total * target;
        }
    }

    let profile = HourlyProfile(values);
    debug!(
        pattern = %shape.pattern,
        peak_factor,
        time_shift = shape.time_shift_hours,
        peak_hour = profile.peak_hour(),
        "Generated hourly profile"
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9 * expected.abs().max(1.0),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_uniform_is_flat_regardless_of_modifiers() {
        let shape = DistributionShape::new(DistributionPattern::Uniform, 4.7, -3.2);
        let profile = generate_distribution(&shape, 41.5).unwrap();
        assert_eq!(profile, HourlyProfile::flat(41.5));

        // Peak and shift are not even validated for the flat pattern
        let shape = DistributionShape::new(DistributionPattern::Uniform, 0.0, f64::NAN);
        assert_eq!(generate_distribution(&shape, 2.0).unwrap(), HourlyProfile::flat(2.0));
    }

    #[test]
    fn test_sum_is_preserved_for_every_shaped_pattern() {
        for pattern in DistributionPattern::ALL {
            if pattern == DistributionPattern::Uniform {
                continue;
            }
            for (peak, shift) in [(1.0, 0.0), (2.0, 3.5), (5.0, -12.0), (0.5, 7.0)] {
                let shape = DistributionShape::new(pattern, peak, shift);
                let profile = generate_distribution(&shape, 1000.0 / 24.0).unwrap();
                assert_close(profile.sum(), 1000.0);
            }
        }
    }

    #[test]
    fn test_zero_baseline_returns_zero_profile() {
        let shape = DistributionShape::new(DistributionPattern::PeakBusinessHours, 3.0, 2.0);
        let profile = generate_distribution(&shape, 0.0).unwrap();
        assert_eq!(profile, HourlyProfile::flat(0.0));
    }

    #[test]
    fn test_skew_alone_is_a_sine_wave() {
        // A peak factor of 1 leaves only the skew step
        let shape = DistributionShape::new(DistributionPattern::PeakBusinessHours, 1.0, 0.0);
        let profile = generate_distribution(&shape, 10.0).unwrap();

        assert_close(profile[0], 10.0);
        assert_close(profile[6], 15.0);
        assert_close(profile[12], 10.0);
        assert_close(profile[18], 5.0);
    }

    #[test]
    fn test_time_shift_moves_the_skew_phase() {
        let shape = DistributionShape::new(DistributionPattern::PeakBusinessHours, 1.0, 6.0);
        let profile = generate_distribution(&shape, 10.0).unwrap();
        assert_close(profile[0], 15.0);
        assert_close(profile[12], 5.0);
    }

    #[test]
    fn test_business_peak_exceeds_off_hours() {
        let shape = DistributionShape::new(DistributionPattern::PeakBusinessHours, 3.0, 0.0);
        let profile = generate_distribution(&shape, 10.0).unwrap();
        assert!(profile[12] > profile[20]);
        assert!(profile[9] > profile[8]);
    }

    #[test]
    fn test_night_window_wraps_midnight() {
        let shape = DistributionShape::new(DistributionPattern::PeakNightHours, 3.0, 0.0);
        let profile = generate_distribution(&shape, 10.0).unwrap();
        assert!(profile[23] > profile[12]);
        assert!(profile[2] > profile[12]);
    }

    #[test]
    fn test_shorter_and_longer_peak_are_inverse() {
        let shorter = DistributionShape::new(DistributionPattern::ShorterDuringPeak, 2.0, 0.0);
        let longer = DistributionShape::new(DistributionPattern::LongerDuringPeak, 2.0, 0.0);
        let shorter = generate_distribution(&shorter, 5.0).unwrap();
        let longer = generate_distribution(&longer, 5.0).unwrap();

        assert!(shorter[12] < longer[12]);
        assert!(shorter[2] > longer[2]);
    }

    #[test]
    fn test_random_pattern_is_reproducible_with_seed() {
        let shape = DistributionShape::new(DistributionPattern::RandomVariable, 3.0, 0.0);
        let a = generate_distribution_with_rng(&shape, 5.0, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_distribution_with_rng(&shape, 5.0, &mut StdRng::seed_from_u64(7)).unwrap();
        let c = generate_distribution_with_rng(&shape, 5.0, &mut StdRng::seed_from_u64(8)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_close(a.sum(), 120.0);
        assert_eq!(
            generate_distribution(&shape, 5.0).unwrap(),
            generate_distribution(&shape, 5.0).unwrap()
        );
    }

    #[test]
    fn test_invalid_arguments_are_rejected() {
        let shape = DistributionShape::new(DistributionPattern::HeavyMorning, 0.0, 0.0);
        assert!(matches!(
            generate_distribution(&shape, 1.0),
            Err(EstimatorError::InvalidArgument(_))
        ));

        let shape = DistributionShape::new(DistributionPattern::HeavyMorning, 2.0, 0.0);
        assert!(matches!(
            generate_distribution(&shape, -1.0),
            Err(EstimatorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pattern_parsing() {
        assert_eq!(
            "normalBusiness".parse::<DistributionPattern>().unwrap(),
            DistributionPattern::PeakBusinessHours
        );
        assert_eq!(
            "VARIABLE".parse::<DistributionPattern>().unwrap(),
            DistributionPattern::RandomVariable
        );
        assert!(matches!(
            "lunchRush".parse::<DistributionPattern>(),
            Err(EstimatorError::InvalidArgument(_))
        ));

        for pattern in DistributionPattern::ALL {
            assert_eq!(pattern.to_string().parse::<DistributionPattern>().unwrap(), pattern);
        }
    }

    #[test]
    fn test_profile_rejects_negative_values() {
        let mut values = [1.0; HOURS_PER_DAY];
        values[5] = -0.5;
        assert!(HourlyProfile::from_values(values).is_err());
        values[5] = 0.5;
        assert_eq!(HourlyProfile::from_values(values).unwrap().peak_hour(), 0);
    }
}
