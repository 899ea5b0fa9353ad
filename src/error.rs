use thiserror::Error;

/// Estimator error types
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// Precondition violated by the caller (bad pattern, negative duration, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Tariff lookup by name failed
    #[error("Not found: {0}")]
    NotFound(String),
    /// Configuration or tariff definition error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, EstimatorError>;

impl EstimatorError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Prefix the message with where the error arose, keeping its kind
    pub fn context(self, location: &str) -> Self {
        match self {
            Self::InvalidArgument(msg) => Self::InvalidArgument(format!("{}: {}", location, msg)),
            Self::NotFound(msg) => Self::NotFound(format!("{}: {}", location, msg)),
            Self::ConfigError(msg) => Self::ConfigError(format!("{}: {}", location, msg)),
        }
    }
}

/// Stable machine-readable name for an error, used in JSON output
pub fn error_type_name(error: &EstimatorError) -> &'static str {
    match error {
        EstimatorError::InvalidArgument(_) => "invalid_argument",
        EstimatorError::NotFound(_) => "not_found",
        EstimatorError::ConfigError(_) => "config_error",
    }
}

impl From<config::ConfigError> for EstimatorError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for EstimatorError {
    fn from(err: toml::ser::Error) -> Self {
        Self::ConfigError(format!("TOML error: {}", err))
    }
}
