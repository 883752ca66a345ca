/// Database module for carrental
///
/// Handles the SQLite side: the rentals table and the car inventory.
/// Implements connection pooling through sqlx.

pub mod connection;
pub mod inventory;
pub mod models;
pub mod rentals;

pub use connection::Database;
pub use inventory::CarInventory;
pub use models::*;
pub use rentals::TableRecordStore;
