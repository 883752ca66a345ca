/// Data models shared by the stores
///
/// Field names on the wire and in the tables are the legacy Spanish ones
/// (`dias_alquiler`, `num_vehi`, `descuento`); existing files and databases
/// depend on them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Top-level key of a rentals document
pub const RENTALS_KEY: &str = "rentals";

/// A single rental offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RentalRecord {
    /// Store-assigned key. `None` until the record has been appended, and on
    /// legacy file entries written before keys existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub co2_rating: String,
    pub engine: String,
    #[serde(rename = "dias_alquiler")]
    #[sqlx(rename = "dias_alquiler")]
    pub rental_days: u32,
    #[serde(rename = "num_vehi")]
    #[sqlx(rename = "num_vehi")]
    pub unit_count: u32,
    /// Percentage, never negative
    #[serde(rename = "descuento")]
    #[sqlx(rename = "descuento")]
    pub discount: f64,
}

impl RentalRecord {
    /// A record that has not been stored yet
    pub fn new(
        co2_rating: impl Into<String>,
        engine: impl Into<String>,
        rental_days: u32,
        unit_count: u32,
        discount: f64,
    ) -> Self {
        Self {
            id: None,
            co2_rating: co2_rating.into(),
            engine: engine.into(),
            rental_days,
            unit_count,
            discount,
        }
    }

    /// Same record with the store's key attached
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Ordered list of rentals, insertion order preserved
pub type RecordCollection = Vec<RentalRecord>;

/// A car the chatbot can talk about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CarInventoryRow {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub available: bool,
    pub price_per_day: f64,
}

/// Input for adding a car to the inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub available: bool,
    pub price_per_day: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_legacy_names() {
        let record = RentalRecord::new("54", "Hybrid", 3, 2, 12.5);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["dias_alquiler"], 3);
        assert_eq!(value["num_vehi"], 2);
        assert_eq!(value["descuento"], 12.5);
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_with_id() {
        let record = RentalRecord::new("71", "Electric", 1, 1, 0.0).with_id(7);
        assert_eq!(record.id, Some(7));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 7);
    }
}
