//! Error types and handling for the `citycast` library

use thiserror::Error;

/// Coarse classification of a failed forecast fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response could be obtained (connection, timeout, non-2xx status)
    Transport,
    /// The request succeeded but the body was empty
    EmptyPayload,
    /// The body does not match the forecast schema
    Decode,
}

/// Terminal outcome of a failed forecast fetch. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Forecast response had an empty body")]
    EmptyPayload,

    #[error("Failed to decode forecast: {message}")]
    Decode { message: String },
}

impl FetchError {
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Transport { .. } => ErrorKind::Transport,
            FetchError::EmptyPayload => ErrorKind::EmptyPayload,
            FetchError::Decode { .. } => ErrorKind::Decode,
        }
    }
}

/// Main error type for the `citycast` library
#[derive(Error, Debug)]
pub enum CitycastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// City dataset could not be parsed
    #[error("City catalog error: {message}")]
    Catalog { message: String },

    /// Forecast fetch failures
    #[error(transparent)]
    Fetch(#[from] FetchError),

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

impl CitycastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new catalog error
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CitycastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            CitycastError::Catalog { .. } => {
                "The city list could not be read. Please check the dataset file.".to_string()
            }
            CitycastError::Fetch(FetchError::Transport { .. }) => {
                "Unable to reach the forecast service. Please check your internet connection."
                    .to_string()
            }
            CitycastError::Fetch(FetchError::EmptyPayload) => {
                "The forecast service returned no data.".to_string()
            }
            CitycastError::Fetch(FetchError::Decode { .. }) => {
                "The forecast service returned data in an unexpected format.".to_string()
            }
            CitycastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            CitycastError::General { message } => message.clone(),
        }
    }
}
