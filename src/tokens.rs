//! Per-call token estimation
//!
//! A call's transcript size is derived from its duration and a speaking
//! rate; the task policy then decides how much the model writes back.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EstimatorError, Result};

pub const DEFAULT_WORDS_PER_MINUTE: f64 = 150.0;
pub const DEFAULT_TOKENS_PER_WORD: f64 = 1.5;

/// Output tokens per sentiment verdict
const SENTIMENT_OUTPUT_TOKENS: u64 = 50;

/// AI workload applied to each call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TaskPolicy {
    /// Summary sized at 20% of the transcript
    Summarization,
    /// One fixed-size sentiment verdict per call
    #[serde(rename = "sentiment")]
    SentimentFixed,
    /// A sentiment verdict every `interval_minutes` of conversation
    RealTimeSentiment { interval_minutes: f64 },
    /// Summary plus sentiment, sized at 30% of the transcript
    ComplexAnalysis,
}

impl TaskPolicy {
    pub const KEYS: [&'static str; 4] = [
        "summarization",
        "sentiment",
        "realTimeSentiment",
        "complexAnalysis",
    ];

    /// Build a policy from its key; `interval_minutes` is only used by real-time sentiment
    pub fn from_key(key: &str, interval_minutes: f64) -> Result<Self> {
        let task = match key {
            k if k.eq_ignore_ascii_case("summarization") => Self::Summarization,
            k if k.eq_ignore_ascii_case("sentiment") => Self::SentimentFixed,
            k if k.eq_ignore_ascii_case("realTimeSentiment") => {
                Self::RealTimeSentiment { interval_minutes }
            }
            k if k.eq_ignore_ascii_case("complexAnalysis") => Self::ComplexAnalysis,
            other => {
                return Err(EstimatorError::invalid(format!("unknown task type '{}'", other)))
            }
        };
        task.validate()?;
        Ok(task)
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Summarization => "summarization",
            Self::SentimentFixed => "sentiment",
            Self::RealTimeSentiment { .. } => "realTimeSentiment",
            Self::ComplexAnalysis => "complexAnalysis",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Summarization => "Call Summarization",
            Self::SentimentFixed => "Sentiment Analysis",
            Self::RealTimeSentiment { .. } => "Real-time Sentiment Analysis",
            Self::ComplexAnalysis => "Complex Analysis (Summary + Sentiment)",
        }
    }

    /// One-line description of the output-size rule
    pub fn output_rule(&self) -> String {
        match self {
            Self::Summarization => "output = 20% of transcript tokens".to_string(),
            Self::SentimentFixed => format!("output = {} tokens per call", SENTIMENT_OUTPUT_TOKENS),
            Self::RealTimeSentiment { interval_minutes } => format!(
                "output = {} tokens every {} minute(s)",
                SENTIMENT_OUTPUT_TOKENS, interval_minutes
            ),
            Self::ComplexAnalysis => "output = 30% of transcript tokens".to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Self::RealTimeSentiment { interval_minutes } = self {
            if !interval_minutes.is_finite() || *interval_minutes <= 0.0 {
                return Err(EstimatorError::invalid(format!(
                    "real-time interval must be positive, got {}",
                    interval_minutes
                )));
            }
        }
        Ok(())
    }
}

impl Default for TaskPolicy {
    fn default() -> Self {
        Self::Summarization
    }
}

impl fmt::Display for TaskPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Token counts for a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenEstimate {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Converts call durations into token counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenEstimator {
    pub words_per_minute: f64,
    pub tokens_per_word: f64,
}

impl TokenEstimator {
    pub fn new(words_per_minute: f64, tokens_per_word: f64) -> Result<Self> {
        for (name, value) in [
            ("words per minute", words_per_minute),
            ("tokens per word", tokens_per_word),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EstimatorError::invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(Self {
            words_per_minute,
            tokens_per_word,
        })
    }

    /// Transcript tokens for a call, before any prompt context is added
    pub fn transcript_tokens(&self, duration_minutes: f64) -> Result<u64> {
        if !duration_minutes.is_finite() || duration_minutes < 0.0 {
            return Err(EstimatorError::invalid(format!(
                "call duration must be a non-negative number of minutes, got {}",
                duration_minutes
            )));
        }
        whole_count(
            duration_minutes * self.words_per_minute * self.tokens_per_word,
            "transcript tokens",
        )
    }

    /// Estimate input and output tokens for one call
    ///
    /// Ratio-based outputs are computed from the transcript alone; context
    /// tokens count toward input but never toward the ratio base.
    pub fn estimate(
        &self,
        duration_minutes: f64,
        task: &TaskPolicy,
        context_tokens: u64,
    ) -> Result<TokenEstimate> {
        task.validate()?;
        let transcript = self.transcript_tokens(duration_minutes)?;

        let output_tokens = match task {
            TaskPolicy::Summarization => ceil_tenths(transcript, 2)?,
            TaskPolicy::SentimentFixed => SENTIMENT_OUTPUT_TOKENS,
            TaskPolicy::RealTimeSentiment { interval_minutes } => {
                whole_count(duration_minutes / interval_minutes, "sentiment intervals")?
                    .checked_mul(SENTIMENT_OUTPUT_TOKENS)
                    .ok_or_else(|| overflow("output tokens"))?
            }
            TaskPolicy::ComplexAnalysis => ceil_tenths(transcript, 3)?,
        };

        let input_tokens = transcript
            .checked_add(context_tokens)
            .ok_or_else(|| overflow("input tokens"))?;
        let total_tokens = input_tokens
            .checked_add(output_tokens)
            .ok_or_else(|| overflow("total tokens"))?;
        Ok(TokenEstimate {
            input_tokens,
            output_tokens,
            total_tokens,
        })
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            tokens_per_word: DEFAULT_TOKENS_PER_WORD,
        }
    }
}

/// `ceil(value * tenths / 10)` in integer arithmetic
fn ceil_tenths(value: u64, tenths: u64) -> Result<u64> {
    value
        .checked_mul(tenths)
        .map(|scaled| scaled.div_ceil(10))
        .ok_or_else(|| overflow("output tokens"))
}

/// Round a non-negative count up, rejecting values beyond `u64`
fn whole_count(value: f64, what: &str) -> Result<u64> {
    let rounded = value.ceil();
    // u64::MAX as f64 is 2^64, the first value that no longer fits
    if rounded >= u64::MAX as f64 {
        return Err(overflow(what));
    }
    Ok(rounded as u64)
}

fn overflow(what: &str) -> EstimatorError {
    EstimatorError::invalid(format!("{} exceed the representable range", what))
}

/// Estimate tokens for one call at the default speaking rate
pub fn estimate_tokens(
    duration_minutes: f64,
    task: &TaskPolicy,
    context_tokens: u64,
) -> Result<TokenEstimate> {
    TokenEstimator::default().estimate(duration_minutes, task, context_tokens)
}
