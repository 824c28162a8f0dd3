//! Error types and handling for the weather dashboard

use std::collections::HashMap;
use thiserror::Error;

/// Machine-readable classification of API failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The API key was rejected (HTTP 401)
    ApiUnauthorized,
    /// The requested city or coordinates are unknown (HTTP 404)
    ApiLocationNotFound,
    /// Too many requests (HTTP 429)
    ApiRateLimit,
    /// Transport failure or unexpected status
    ApiNetworkError,
    /// The response body could not be decoded
    ApiInvalidResponse,
}

/// Main error type for the weather dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api {
        message: String,
        code: ErrorCode,
        context: HashMap<String, String>,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// A radar sweep aborted because one lattice point could not be fetched
    #[error("Sampling failed at ({latitude:.4}, {longitude:.4}): {cause}")]
    SamplingFailed {
        latitude: f64,
        longitude: f64,
        cause: String,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl DashboardError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error carrying request details
    pub fn api_with_context<S: Into<String>>(
        message: S,
        code: ErrorCode,
        context: HashMap<String, String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            code,
            context,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a sampling failure for the lattice point at `(latitude, longitude)`
    pub fn sampling_failed<S: Into<String>>(latitude: f64, longitude: f64, cause: S) -> Self {
        Self::SamplingFailed {
            latitude,
            longitude,
            cause: cause.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// API error code, if this is an API error
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            DashboardError::Api { code, message, .. } => match code {
                ErrorCode::ApiUnauthorized => {
                    "Invalid API key. Please check your OpenWeatherMap API key.".to_string()
                }
                ErrorCode::ApiLocationNotFound => {
                    "City not found. Please check the spelling and try again.".to_string()
                }
                ErrorCode::ApiRateLimit => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ErrorCode::ApiNetworkError => {
                    "Unable to connect to the weather service. Please check your internet connection."
                        .to_string()
                }
                ErrorCode::ApiInvalidResponse => format!("Unexpected weather data: {message}"),
            },
            DashboardError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            DashboardError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            DashboardError::SamplingFailed {
                latitude,
                longitude,
                ..
            } => format!(
                "Radar data could not be loaded near {latitude:.2}, {longitude:.2}. Please retry."
            ),
            DashboardError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            DashboardError::General { message } => message.clone(),
        }
    }
}

impl From<fjall::Error> for DashboardError {
    fn from(err: fjall::Error) -> Self {
        DashboardError::cache(err.to_string())
    }
}

impl From<postcard::Error> for DashboardError {
    fn from(err: postcard::Error) -> Self {
        DashboardError::cache(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = DashboardError::config("missing API key");
        assert!(matches!(config_err, DashboardError::Config { .. }));

        let api_err = DashboardError::api_with_context(
            "connection failed",
            ErrorCode::ApiNetworkError,
            HashMap::new(),
        );
        assert!(matches!(api_err, DashboardError::Api { .. }));
        assert_eq!(api_err.code(), Some(ErrorCode::ApiNetworkError));

        let validation_err = DashboardError::validation("invalid coordinates");
        assert!(matches!(validation_err, DashboardError::Validation { .. }));
        assert_eq!(validation_err.code(), None);
    }

    #[test]
    fn test_user_messages() {
        let config_err = DashboardError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let not_found = DashboardError::api_with_context(
            "404",
            ErrorCode::ApiLocationNotFound,
            HashMap::new(),
        );
        assert!(not_found.user_message().contains("City not found"));

        let validation_err = DashboardError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_sampling_failure_carries_coordinate() {
        let err = DashboardError::sampling_failed(41.5, -74.0, "timeout");
        assert_eq!(
            err.to_string(),
            "Sampling failed at (41.5000, -74.0000): timeout"
        );
        assert!(err.user_message().contains("41.50, -74.00"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let dash_err: DashboardError = io_err.into();
        assert!(matches!(dash_err, DashboardError::Io { .. }));
    }
}
