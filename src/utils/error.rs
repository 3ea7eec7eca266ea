use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Field {field} out of range: {value} (expected {min} to {max})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidFormat {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Planetary computation failed: {message}")]
    Computation { message: String },

    #[error("House calculations unavailable: {message}")]
    HouseBackendUnavailable { message: String },

    #[error("House cache error: {message}")]
    Cache { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Computation,
    Degradation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ChartError {
    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation {
            message: message.into(),
        }
    }

    pub fn house_backend(message: impl Into<String>) -> Self {
        Self::HouseBackendUnavailable {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingField { .. } | Self::OutOfRange { .. } | Self::InvalidFormat { .. } => {
                ErrorCategory::Validation
            }
            Self::Computation { .. } => ErrorCategory::Computation,
            Self::HouseBackendUnavailable { .. } | Self::Cache { .. } => {
                ErrorCategory::Degradation
            }
            Self::Config { .. } | Self::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            Self::Http(_) | Self::Io(_) | Self::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Degradation => ErrorSeverity::Low,
            ErrorCategory::Computation => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Only validation and planetary computation failures stop a chart.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::Computation
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "Provide birth date, birth time, coordinates and time zone",
            Self::OutOfRange { .. } => {
                "Latitude must be within -90..90 and longitude within -180..180"
            }
            Self::InvalidFormat { .. } => {
                "Use YYYY-MM-DD for dates, HH:MM for times and an IANA zone such as Europe/Berlin"
            }
            Self::Computation { .. } => "Check that the ephemeris backend is reachable and retry",
            Self::HouseBackendUnavailable { .. } => {
                "The chart was produced without houses; check the house backend"
            }
            Self::Cache { .. } => "The house cache is optional; check the cache store if this persists",
            Self::Config { .. } | Self::InvalidConfigValue { .. } => {
                "Review the configuration file and environment variables"
            }
            Self::Http(_) => "Check network connectivity to the configured endpoints",
            Self::Io(_) => "Check file permissions and available disk space",
            Self::Serialization(_) => "Check that backend responses are valid JSON",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Invalid birth data: {}", self),
            ErrorCategory::Computation => {
                "Planetary positions could not be calculated right now".to_string()
            }
            ErrorCategory::Degradation => format!("Chart produced with reduced detail: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("Unexpected system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_validation_and_computation_are_fatal() {
        assert!(ChartError::MissingField {
            field: "birthDate".to_string()
        }
        .is_fatal());
        assert!(ChartError::computation("backend down").is_fatal());
        assert!(!ChartError::house_backend("binary missing").is_fatal());
        assert!(!ChartError::cache("throttled").is_fatal());
    }

    #[test]
    fn test_house_backend_message_mentions_unavailable() {
        let err = ChartError::house_backend("timed out");
        assert_eq!(
            err.to_string(),
            "House calculations unavailable: timed out"
        );
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }
}
