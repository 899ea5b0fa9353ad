/// Integration tests for end-to-end daily cost estimation
use callcenter_cost::{
    compute_cost,
    config::load_config,
    cost::price_speech,
    DistributionPattern, DistributionShape, EstimatorError, PricingCatalog, SimulationInput,
    SpeechCharge, SpeechTariff, TaskPolicy,
};
use std::io::Write;

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-6 * expected.abs().max(1.0)
}

fn input_for(calls: f64, duration: f64, speech_model: &str) -> SimulationInput {
    let catalog = PricingCatalog::builtin();
    let mut input = SimulationInput::new(
        calls,
        duration,
        catalog.language_model("GPT-4o Global Deployment").unwrap().clone(),
        catalog.speech_model(speech_model).unwrap().clone(),
    );
    input.context_tokens = 100;
    input
}

#[test]
fn test_uniform_summarization_day() {
    let input = input_for(1000.0, 5.0, "Whisper TTS (Text to Speech)");
    let result = compute_cost(&input).unwrap();

    assert!(close(result.total_input_tokens, 1_225_000.0));
    assert!(close(result.total_output_tokens, 225_000.0));
    assert!(close(result.total_characters, 3_750_000.0));
    assert!(close(result.language_model_cost, 9.50));
    assert!(close(result.speech_cost, 56.25));
    assert!(close(result.daily_cost, 65.75));
    assert!(close(result.monthly_cost, 1972.50));
    assert!(close(result.yearly_cost, 24_008.75));

    let per_call = result.tokens_per_average_call.unwrap();
    assert_eq!(per_call.input_tokens, 1225);
    assert_eq!(per_call.output_tokens, 225);
    assert_eq!(result.hourly_breakdown.len(), 24);
}

#[test]
fn test_every_pattern_preserves_daily_calls() {
    for pattern in DistributionPattern::ALL {
        let mut input = input_for(4800.0, 6.0, "Whisper TTS HD");
        input.call_pattern = DistributionShape::new(pattern, 3.0, 5.0);
        input.seed = Some(7);

        let result = compute_cost(&input).unwrap();
        let calls: f64 = result.hourly_breakdown.iter().map(|h| h.calls).sum();
        assert!(close(calls, 4800.0), "{} gave {} calls", pattern, calls);
        assert!(result.hourly_breakdown.iter().all(|h| h.calls >= 0.0));
    }
}

#[test]
fn test_tiered_speech_within_first_tier() {
    // 12,000 calls of 5 minutes = 1,000 hours
    let input = input_for(12_000.0, 5.0, "Azure STT - Standard");
    let result = compute_cost(&input).unwrap();

    assert!(close(result.total_hours_used, 1000.0));
    assert!(close(result.speech_cost, 1600.0));
    match result.speech_charge {
        SpeechCharge::Tiered { tier, overage_hours } => {
            assert_eq!(tier.hours_ceiling, 2000.0);
            assert_eq!(overage_hours, 0.0);
        }
        other => panic!("expected tiered charge, got {:?}", other),
    }
}

#[test]
fn test_tiered_speech_overflow_bills_overage() {
    // 720,000 calls of 5 minutes = 60,000 hours, 10,000 above the last ceiling
    let input = input_for(720_000.0, 5.0, "Azure STT - Standard");
    let result = compute_cost(&input).unwrap();

    assert!(close(result.total_hours_used, 60_000.0));
    assert!(close(result.speech_cost, 30_000.0));
}

#[test]
fn test_tier_boundaries() {
    let catalog = PricingCatalog::builtin();
    let custom = catalog.speech_model("Azure STT - Custom").unwrap();

    let (at_ceiling, _) = price_speech(custom, 2000.0, 0.0).unwrap();
    assert_eq!(at_ceiling, 1920.0);

    let (just_above, _) = price_speech(custom, 2000.01, 0.0).unwrap();
    assert_eq!(just_above, 7800.0);

    let (zero, _) = price_speech(custom, 0.0, 0.0).unwrap();
    assert_eq!(zero, 1920.0);
}

#[test]
fn test_compute_is_idempotent() {
    let mut input = input_for(2500.0, 4.0, "Whisper TTS HD");
    input.call_pattern = DistributionShape::new(DistributionPattern::HeavyMorning, 2.5, -3.0);
    input.duration_pattern = DistributionShape::new(DistributionPattern::RandomVariable, 2.0, 0.0);
    input.task = TaskPolicy::RealTimeSentiment {
        interval_minutes: 1.5,
    };

    let first = compute_cost(&input).unwrap();
    let second = compute_cost(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_seed_controls_random_pattern() {
    let mut input = input_for(1000.0, 5.0, "Whisper TTS (Text to Speech)");
    input.duration_pattern = DistributionShape::new(DistributionPattern::RandomVariable, 3.0, 0.0);

    input.seed = Some(1);
    let (_, seeded_a) = input.profiles().unwrap();
    let (_, seeded_b) = input.profiles().unwrap();
    input.seed = Some(2);
    let (_, other) = input.profiles().unwrap();

    assert_eq!(seeded_a, seeded_b);
    assert_ne!(seeded_a, other);
    assert!(close(other.sum(), 5.0 * 24.0));
}

#[test]
fn test_zero_calls_costs_only_tier_base() {
    let input = input_for(0.0, 5.0, "Azure STT - Standard");
    let result = compute_cost(&input).unwrap();

    assert_eq!(result.total_input_tokens, 0.0);
    assert_eq!(result.language_model_cost, 0.0);
    assert_eq!(result.speech_cost, 1600.0);
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let mut input = input_for(-1.0, 5.0, "Whisper TTS HD");
    assert!(matches!(
        compute_cost(&input),
        Err(EstimatorError::InvalidArgument(_))
    ));

    input.total_daily_calls = 100.0;
    input.task = TaskPolicy::RealTimeSentiment {
        interval_minutes: 0.0,
    };
    assert!(matches!(
        compute_cost(&input),
        Err(EstimatorError::InvalidArgument(_))
    ));

    input.task = TaskPolicy::Summarization;
    input.speech_model = SpeechTariff::TieredHourly {
        name: "Empty".to_string(),
        tiers: Vec::new(),
    };
    assert!(matches!(
        compute_cost(&input),
        Err(EstimatorError::ConfigError(_))
    ));
}

#[test]
fn test_unknown_model_is_not_found() {
    let catalog = PricingCatalog::builtin();
    let err = catalog.language_model("Claude Call Bot").unwrap_err();
    assert!(matches!(err, EstimatorError::NotFound(_)));
    assert!(err.to_string().contains("Claude Call Bot"));
}

#[test]
fn test_config_file_drives_simulation() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[calls]
total_daily = 12000
avg_duration_minutes = 5
context_tokens = 0

[task]
type = "sentiment"

[models]
language_model = "GPT-4o-mini Global Deployment"
speech_model = "Azure STT - Standard"
"#
    )
    .unwrap();

    let cfg = load_config(Some(file.path())).unwrap();
    let input = cfg.to_simulation_input(PricingCatalog::builtin()).unwrap();
    assert_eq!(input.task, TaskPolicy::SentimentFixed);

    let result = compute_cost(&input).unwrap();
    // 12,000 calls * 50 output tokens
    assert!(close(result.total_output_tokens, 600_000.0));
    // 12,000 * 1125 input tokens * $0.15 + 600,000 * $0.60, per million
    assert!(close(result.language_model_cost, 2.025 + 0.36));
    assert!(close(result.speech_cost, 1600.0));
}
