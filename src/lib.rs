/// carrental library
///
/// Rental offers kept in a JSON file and a SQLite table, plus a keyword
/// chatbot answering from the car inventory.

pub mod auth;
pub mod chat;
pub mod config;
pub mod core;
pub mod db;
pub mod error;

// Re-exports for convenience
pub use auth::{CredentialVerifier, StaticCredentials};
pub use config::Config;
pub use db::Database;
pub use error::{RentalError, Result};
