/// Error types for carrental
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for carrental operations
#[derive(Error, Debug)]
pub enum RentalError {
    /// Caller-supplied fields are missing or unparsable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A document does not have the expected structure
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The persisted rentals file exists but cannot be decoded
    #[error("Corrupt store at {}: {reason}", .path.display())]
    CorruptStore { path: PathBuf, reason: String },

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database connection or query failure
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    /// Serialization error while writing a document
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential check failed
    #[error("Invalid credentials")]
    Unauthorized,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for carrental operations
pub type Result<T> = std::result::Result<T, RentalError>;

impl RentalError {
    /// Convert RentalError to a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RentalError::InvalidInput(reason) => format!("Invalid input: {}", reason),
            RentalError::MalformedDocument(reason) => {
                format!("Data format error: {}", reason)
            }
            RentalError::CorruptStore { path, reason } => format!(
                "Rentals file {} could not be read and was left untouched. Details: {}",
                path.display(),
                reason
            ),
            RentalError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            RentalError::StoreUnavailable(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            RentalError::Serialization(e) => format!("Data format error: {}", e),
            RentalError::Unauthorized => "Invalid user id or password".to_string(),
            RentalError::Config(msg) => format!("Configuration issue: {}", msg),
        }
    }

    /// Whether the failure is on our side rather than the caller's
    pub fn is_server_side(&self) -> bool {
        !matches!(
            self,
            RentalError::InvalidInput(_) | RentalError::Unauthorized
        )
    }
}
