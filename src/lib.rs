pub mod catalog;
pub mod config;
pub mod cost;
pub mod distribution;
pub mod error;
pub mod simulation;
pub mod tokens;

pub use catalog::{LanguageModelTariff, PricingCatalog, SpeechTariff, SpeechTier};
pub use cost::{CostBreakdown, CostCalculator, CostResult, HourlyUsage, SpeechCharge};
pub use distribution::{
    generate_distribution, generate_distribution_with_rng, DistributionPattern, DistributionShape,
    HourlyProfile,
};
pub use error::EstimatorError;
pub use simulation::{compute_cost, compute_cost_with_rng, SimulationInput};
pub use tokens::{estimate_tokens, TaskPolicy, TokenEstimate, TokenEstimator};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// Logs go to stderr so report output on stdout stays clean. The filter
/// comes from `RUST_LOG` and defaults to `warn`.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
