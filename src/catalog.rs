//! Static pricing tables for language models and speech recognition
//!
//! The built-in catalog is process-wide constant data, built once on first
//! use and never mutated. All prices are USD.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::error::{EstimatorError, Result};

/// Version tag of the built-in price list
pub const CATALOG_VERSION: &str = "2024-08";

/// Language model pricing (per 1M tokens)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageModelTariff {
    pub name: String,
    pub input_price_per_million: f64,
    pub output_price_per_million: f64,
    /// Provisioned throughput unit price, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ptu_price_per_hour: Option<f64>,
}

impl LanguageModelTariff {
    pub fn new(name: impl Into<String>, input_price: f64, output_price: f64) -> Self {
        Self {
            name: name.into(),
            input_price_per_million: input_price,
            output_price_per_million: output_price,
            ptu_price_per_hour: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_price(&self.name, "input price", self.input_price_per_million)?;
        check_price(&self.name, "output price", self.output_price_per_million)?;
        if let Some(ptu) = self.ptu_price_per_hour {
            check_price(&self.name, "PTU price", ptu)?;
        }
        Ok(())
    }
}

/// One band of a tiered hourly speech tariff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechTier {
    pub hours_ceiling: f64,
    pub base_price: f64,
    pub overage_rate_per_hour: f64,
}

impl SpeechTier {
    pub const fn new(hours_ceiling: f64, base_price: f64, overage_rate_per_hour: f64) -> Self {
        Self {
            hours_ceiling,
            base_price,
            overage_rate_per_hour,
        }
    }
}

/// Speech recognition pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeechTariff {
    /// Billed per million transcribed characters
    FlatRate {
        name: String,
        price_per_million_characters: f64,
    },
    /// Billed against the smallest tier covering the day's hours
    ///
    /// Tiers are ordered by strictly increasing ceiling; the last one is
    /// the overflow tier whose overage rate applies beyond its ceiling.
    TieredHourly { name: String, tiers: Vec<SpeechTier> },
}

impl SpeechTariff {
    pub fn flat_rate(name: impl Into<String>, price_per_million_characters: f64) -> Result<Self> {
        let tariff = Self::FlatRate {
            name: name.into(),
            price_per_million_characters,
        };
        tariff.validate()?;
        Ok(tariff)
    }

    pub fn tiered(name: impl Into<String>, tiers: Vec<SpeechTier>) -> Result<Self> {
        let tariff = Self::TieredHourly {
            name: name.into(),
            tiers,
        };
        tariff.validate()?;
        Ok(tariff)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::FlatRate { name, .. } | Self::TieredHourly { name, .. } => name,
        }
    }

    pub fn is_tiered(&self) -> bool {
        matches!(self, Self::TieredHourly { .. })
    }

    /// Tier billed for `hours` of usage: the first tier whose ceiling
    /// covers it, else the last tier. `None` for flat-rate tariffs.
    pub fn select_tier(&self, hours: f64) -> Option<&SpeechTier> {
        match self {
            Self::FlatRate { .. } => None,
            Self::TieredHourly { tiers, .. } => tiers
                .iter()
                .find(|tier| tier.hours_ceiling >= hours)
                .or_else(|| tiers.last()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::FlatRate {
                name,
                price_per_million_characters,
            } => check_price(name, "character price", *price_per_million_characters),
            Self::TieredHourly { name, tiers } => {
                if tiers.is_empty() {
                    return Err(EstimatorError::ConfigError(format!(
                        "Speech tariff '{}' has no tiers",
                        name
                    )));
                }
                for tier in tiers {
                    check_price(name, "tier ceiling", tier.hours_ceiling)?;
                    check_price(name, "tier base price", tier.base_price)?;
                    check_price(name, "tier overage rate", tier.overage_rate_per_hour)?;
                }
                if tiers
                    .windows(2)
                    .any(|pair| pair[1].hours_ceiling <= pair[0].hours_ceiling)
                {
                    return Err(EstimatorError::ConfigError(format!(
                        "Speech tariff '{}' tiers must have strictly increasing ceilings",
                        name
                    )));
                }
                Ok(())
            }
        }
    }
}

fn check_price(name: &str, what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EstimatorError::ConfigError(format!(
            "Tariff '{}' has invalid {}: {}",
            name, what, value
        )));
    }
    Ok(())
}

/// Named tariffs available to a simulation
#[derive(Debug, Clone, Serialize)]
pub struct PricingCatalog {
    pub version: String,
    pub language_models: Vec<LanguageModelTariff>,
    pub speech_models: Vec<SpeechTariff>,
}

impl PricingCatalog {
    /// Build a catalog, validating every tariff and name uniqueness
    pub fn new(
        version: impl Into<String>,
        language_models: Vec<LanguageModelTariff>,
        speech_models: Vec<SpeechTariff>,
    ) -> Result<Self> {
        if language_models.is_empty() || speech_models.is_empty() {
            return Err(EstimatorError::ConfigError(
                "Catalog needs at least one language model and one speech model".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for model in &language_models {
            model.validate()?;
            if !seen.insert(model.name.to_lowercase()) {
                return Err(EstimatorError::ConfigError(format!(
                    "Duplicate language model '{}'",
                    model.name
                )));
            }
        }

        seen.clear();
        for model in &speech_models {
            model.validate()?;
            if !seen.insert(model.name().to_lowercase()) {
                return Err(EstimatorError::ConfigError(format!(
                    "Duplicate speech model '{}'",
                    model.name()
                )));
            }
        }

        Ok(Self {
            version: version.into(),
            language_models,
            speech_models,
        })
    }

    /// The built-in catalog, shared for the life of the process
    pub fn builtin() -> &'static PricingCatalog {
        static CATALOG: OnceLock<PricingCatalog> = OnceLock::new();
        CATALOG.get_or_init(builtin_catalog)
    }

    /// Look up a language model by name (case-insensitive)
    pub fn language_model(&self, name: &str) -> Result<&LanguageModelTariff> {
        self.language_models
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| EstimatorError::NotFound(format!("language model '{}'", name)))
    }

    /// Look up a speech model by name (case-insensitive)
    pub fn speech_model(&self, name: &str) -> Result<&SpeechTariff> {
        self.speech_models
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| EstimatorError::NotFound(format!("speech model '{}'", name)))
    }

    pub fn default_language_model(&self) -> Option<&LanguageModelTariff> {
        self.language_models.first()
    }

    pub fn default_speech_model(&self) -> Option<&SpeechTariff> {
        self.speech_models.first()
    }
}

fn gpt_tariff(name: &str, input: f64, output: f64) -> LanguageModelTariff {
    LanguageModelTariff {
        ptu_price_per_hour: Some(2.0),
        ..LanguageModelTariff::new(name, input, output)
    }
}

fn builtin_catalog() -> PricingCatalog {
    PricingCatalog {
        version: CATALOG_VERSION.to_string(),
        language_models: vec![
            gpt_tariff("GPT-4o Global Deployment", 5.0, 15.0),
            gpt_tariff("GPT-4o Regional API", 5.0, 15.0),
            gpt_tariff("GPT-4o-mini Global Deployment", 0.15, 0.60),
            gpt_tariff("GPT-4o-mini Regional API", 0.165, 0.66),
        ],
        speech_models: vec![
            SpeechTariff::FlatRate {
                name: "Whisper TTS (Text to Speech)".to_string(),
                price_per_million_characters: 15.0,
            },
            SpeechTariff::FlatRate {
                name: "Whisper TTS HD".to_string(),
                price_per_million_characters: 30.0,
            },
            SpeechTariff::TieredHourly {
                name: "Azure STT - Standard".to_string(),
                tiers: vec![
                    SpeechTier::new(2000.0, 1600.0, 0.80),
                    SpeechTier::new(10000.0, 6500.0, 0.65),
                    SpeechTier::new(50000.0, 25000.0, 0.50),
                ],
            },
            SpeechTariff::TieredHourly {
                name: "Azure STT - Custom".to_string(),
                tiers: vec![
                    SpeechTier::new(2000.0, 1920.0, 0.96),
                    SpeechTier::new(10000.0, 7800.0, 0.78),
                    SpeechTier::new(50000.0, 30000.0, 0.60),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = PricingCatalog::builtin();
        let rebuilt = PricingCatalog::new(
            catalog.version.clone(),
            catalog.language_models.clone(),
            catalog.speech_models.clone(),
        );
        assert!(rebuilt.is_ok());
        assert_eq!(catalog.version, CATALOG_VERSION);
        assert!(std::ptr::eq(catalog, PricingCatalog::builtin()));
    }

    #[test]
    fn test_lookup_by_name() {
        let catalog = PricingCatalog::builtin();

        let model = catalog.language_model("gpt-4o-mini regional api").unwrap();
        assert_eq!(model.input_price_per_million, 0.165);
        assert_eq!(model.output_price_per_million, 0.66);

        let speech = catalog.speech_model("Azure STT - Custom").unwrap();
        assert!(speech.is_tiered());

        assert_eq!(catalog.default_language_model().unwrap().name, "GPT-4o Global Deployment");
        assert_eq!(
            catalog.default_speech_model().unwrap().name(),
            "Whisper TTS (Text to Speech)"
        );
    }

    #[test]
    fn test_unknown_names_are_not_found() {
        let catalog = PricingCatalog::builtin();
        assert!(matches!(
            catalog.language_model("gpt-5"),
            Err(EstimatorError::NotFound(_))
        ));
        assert!(matches!(
            catalog.speech_model("Deepgram"),
            Err(EstimatorError::NotFound(_))
        ));
    }

    #[test]
    fn test_tier_selection() {
        let tariff = PricingCatalog::builtin().speech_model("Azure STT - Standard").unwrap();

        assert_eq!(tariff.select_tier(0.0).unwrap().hours_ceiling, 2000.0);
        assert_eq!(tariff.select_tier(2000.0).unwrap().hours_ceiling, 2000.0);
        assert_eq!(tariff.select_tier(2000.01).unwrap().hours_ceiling, 10000.0);
        assert_eq!(tariff.select_tier(60000.0).unwrap().hours_ceiling, 50000.0);

        let flat = PricingCatalog::builtin().speech_model("Whisper TTS HD").unwrap();
        assert!(flat.select_tier(10.0).is_none());
    }

    #[test]
    fn test_tiered_requires_increasing_ceilings() {
        let unordered = SpeechTariff::tiered(
            "bad",
            vec![SpeechTier::new(100.0, 10.0, 1.0), SpeechTier::new(100.0, 20.0, 0.5)],
        );
        assert!(matches!(unordered, Err(EstimatorError::ConfigError(_))));

        assert!(SpeechTariff::tiered("empty", vec![]).is_err());
        assert!(SpeechTariff::flat_rate("negative", -1.0).is_err());
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = PricingCatalog::new(
            "test",
            vec![
                LanguageModelTariff::new("a", 1.0, 2.0),
                LanguageModelTariff::new("A", 1.0, 2.0),
            ],
            vec![SpeechTariff::flat_rate("s", 1.0).unwrap()],
        );
        assert!(result.is_err());
    }
}
