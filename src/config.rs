use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::catalog::PricingCatalog;
use crate::distribution::{DistributionPattern, DistributionShape};
use crate::error::{EstimatorError, Result};
use crate::simulation::SimulationInput;
use crate::tokens::{
    TaskPolicy, TokenEstimator, DEFAULT_TOKENS_PER_WORD, DEFAULT_WORDS_PER_MINUTE,
};

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "callcenter.toml";

/// Prefix for environment overrides, e.g. `CALLCENTER__CALLS__TOTAL_DAILY=5000`
pub const ENV_PREFIX: &str = "CALLCENTER";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub calls: CallsConfig,
    pub distribution: DistributionConfig,
    pub task: TaskConfig,
    pub models: ModelsConfig,
    pub speech: SpeechRateConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CallsConfig {
    pub total_daily: f64,
    pub avg_duration_minutes: f64,
    pub context_tokens: u64,
}

impl Default for CallsConfig {
    fn default() -> Self {
        Self {
            total_daily: 1000.0,
            avg_duration_minutes: 5.0,
            context_tokens: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DistributionConfig {
    pub calls: PatternConfig,
    pub durations: PatternConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternConfig {
    pub pattern: String,
    pub peak_factor: f64,
    pub time_shift_hours: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            pattern: DistributionPattern::Uniform.key().to_string(),
            peak_factor: 2.0,
            time_shift_hours: 0.0,
        }
    }
}

impl PatternConfig {
    pub fn to_shape(&self) -> Result<DistributionShape> {
        Ok(DistributionShape::new(
            self.pattern.parse()?,
            self.peak_factor,
            self.time_shift_hours,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TaskConfig {
    #[serde(rename = "type")]
    pub task_type: String,
    pub realtime_interval_minutes: f64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            task_type: TaskPolicy::Summarization.key().to_string(),
            realtime_interval_minutes: 1.0,
        }
    }
}

impl TaskConfig {
    pub fn to_policy(&self) -> Result<TaskPolicy> {
        TaskPolicy::from_key(&self.task_type, self.realtime_interval_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub language_model: String,
    pub speech_model: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            language_model: "GPT-4o Global Deployment".to_string(),
            speech_model: "Whisper TTS (Text to Speech)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeechRateConfig {
    pub words_per_minute: f64,
    pub tokens_per_word: f64,
}

impl Default for SpeechRateConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            tokens_per_word: DEFAULT_TOKENS_PER_WORD,
        }
    }
}

/// Load configuration from defaults, an optional TOML file, and the environment
///
/// A missing file is an error only when `path` is given explicitly.
pub fn load_config(path: Option<&Path>) -> Result<EstimatorConfig> {
    let (file, required) = match path {
        Some(p) => (p.to_string_lossy().into_owned(), true),
        None => (DEFAULT_CONFIG_FILE.to_string(), false),
    };
    debug!(file = %file, required, "Loading configuration");

    let config = config::Config::builder()
        .add_source(config::File::new(&file, config::FileFormat::Toml).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: EstimatorConfig = config.try_deserialize()?;
    validate_config(&cfg, PricingCatalog::builtin())?;

    Ok(cfg)
}

/// Check every field that a simulation would otherwise reject
pub fn validate_config(cfg: &EstimatorConfig, catalog: &PricingCatalog) -> Result<()> {
    fn bail(msg: String) -> Result<()> {
        Err(EstimatorError::ConfigError(msg))
    }

    if !cfg.calls.total_daily.is_finite() || cfg.calls.total_daily < 0.0 {
        return bail(format!(
            "calls.total_daily must be non-negative, got {}",
            cfg.calls.total_daily
        ));
    }
    if !cfg.calls.avg_duration_minutes.is_finite() || cfg.calls.avg_duration_minutes < 0.0 {
        return bail(format!(
            "calls.avg_duration_minutes must be non-negative, got {}",
            cfg.calls.avg_duration_minutes
        ));
    }

    for (section, pattern) in [
        ("distribution.calls", &cfg.distribution.calls),
        ("distribution.durations", &cfg.distribution.durations),
    ] {
        pattern.to_shape().map_err(|e| e.context(section))?;
        if !pattern.peak_factor.is_finite() || pattern.peak_factor <= 0.0 {
            return bail(format!(
                "{}.peak_factor must be positive, got {}",
                section, pattern.peak_factor
            ));
        }
        if !pattern.time_shift_hours.is_finite() {
            return bail(format!("{}.time_shift_hours must be finite", section));
        }
    }

    cfg.task.to_policy().map_err(|e| e.context("task"))?;
    TokenEstimator::new(cfg.speech.words_per_minute, cfg.speech.tokens_per_word)
        .map_err(|e| e.context("speech"))?;

    if catalog.language_model(&cfg.models.language_model).is_err() {
        return bail(format!(
            "models.language_model '{}' is not in the pricing catalog",
            cfg.models.language_model
        ));
    }
    if catalog.speech_model(&cfg.models.speech_model).is_err() {
        return bail(format!(
            "models.speech_model '{}' is not in the pricing catalog",
            cfg.models.speech_model
        ));
    }

    Ok(())
}

impl EstimatorConfig {
    /// Resolve names against `catalog` and build a simulation snapshot
    pub fn to_simulation_input(&self, catalog: &PricingCatalog) -> Result<SimulationInput> {
        Ok(SimulationInput {
            total_daily_calls: self.calls.total_daily,
            avg_call_duration_minutes: self.calls.avg_duration_minutes,
            context_tokens: self.calls.context_tokens,
            call_pattern: self.distribution.calls.to_shape()?,
            duration_pattern: self.distribution.durations.to_shape()?,
            task: self.task.to_policy()?,
            language_model: catalog.language_model(&self.models.language_model)?.clone(),
            speech_model: catalog.speech_model(&self.models.speech_model)?.clone(),
            speech_rate: TokenEstimator::new(
                self.speech.words_per_minute,
                self.speech.tokens_per_word,
            )?,
            seed: self.seed,
        })
    }

    /// Render as TOML, the same shape `load_config` reads
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
