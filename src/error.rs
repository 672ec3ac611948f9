//! Error types and handling for `TripCraft`

use thiserror::Error;

/// Main error type for the `TripCraft` planning core
#[derive(Error, Debug)]
pub enum TripCraftError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors (bad requests, impossible constraints)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Dataset decoding errors
    #[error("Dataset error: {source}")]
    Dataset {
        #[from]
        source: serde_json::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl TripCraftError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
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
            TripCraftError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            TripCraftError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TripCraftError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TripCraftError::Dataset { .. } => {
                "Could not read the attraction dataset. Please check the file format.".to_string()
            }
            TripCraftError::General { message } => message.clone(),
        }
    }
}
