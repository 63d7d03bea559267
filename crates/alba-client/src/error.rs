use thiserror::Error;

use alba_shared::ValidationErrors;
use alba_store::StoreError;

/// Errors returned by the command layer.
#[derive(Error, Debug)]
pub enum CommandError {
    /// One or more form fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => CommandError::NotFound(e.to_string()),
            other => CommandError::Store(other),
        }
    }
}

impl From<ValidationErrors> for CommandError {
    fn from(errors: ValidationErrors) -> Self {
        CommandError::Validation(errors)
    }
}

/// Failures talking to the weather proxy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    #[error("Weather request timed out")]
    Timeout,

    #[error("Weather service unreachable: {0}")]
    Network(String),

    #[error("Weather service answered {status}")]
    Status { status: u16, retryable: bool },

    #[error("Weather response malformed: {0}")]
    Decode(String),
}

impl WeatherError {
    /// Client errors (4xx) will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            WeatherError::Status { retryable, .. } => *retryable,
            _ => true,
        }
    }

    pub fn from_status(status: u16) -> Self {
        WeatherError::Status {
            status,
            retryable: !(400..500).contains(&status),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WeatherError::Timeout
        } else if e.is_decode() {
            WeatherError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            WeatherError::from_status(status.as_u16())
        } else {
            WeatherError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(!WeatherError::from_status(400).is_retryable());
        assert!(!WeatherError::from_status(404).is_retryable());
        assert!(WeatherError::from_status(500).is_retryable());
        assert!(WeatherError::from_status(502).is_retryable());
        assert!(WeatherError::Timeout.is_retryable());
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: CommandError = StoreError::tea_not_found("abc").into();
        assert!(matches!(err, CommandError::NotFound(ref msg) if msg == "Tea not found: abc"));

        let err: CommandError = StoreError::Validation("x".into()).into();
        assert!(matches!(err, CommandError::Store(_)));
    }
}
