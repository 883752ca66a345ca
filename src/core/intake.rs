// Turns raw form fields into a rental and stores it.
//
// Nothing reaches the store unless every field is present and parses.

use crate::core::file_store::FileRecordStore;
use crate::db::RentalRecord;
use crate::error::{RentalError, Result};
use serde::{Deserialize, Serialize};

/// Raw fields of an append request, exactly as the caller sent them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentalForm {
    pub co2_rating: Option<String>,
    pub engine: Option<String>,
    pub dias_alquiler: Option<String>,
    pub num_vehi: Option<String>,
    pub descuento: Option<String>,
}

impl RentalForm {
    /// Validate and convert into a record ready to append
    pub fn into_record(self) -> Result<RentalRecord> {
        let co2_rating = required("co2_rating", self.co2_rating)?;
        let engine = required("engine", self.engine)?;
        let rental_days = parse_count("dias_alquiler", required("dias_alquiler", self.dias_alquiler)?)?;
        let unit_count = parse_count("num_vehi", required("num_vehi", self.num_vehi)?)?;
        let discount = parse_discount(required("descuento", self.descuento)?)?;

        Ok(RentalRecord::new(co2_rating, engine, rental_days, unit_count, discount))
    }
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RentalError::InvalidInput(format!("{} is required", name))),
    }
}

fn parse_count(name: &str, raw: String) -> Result<u32> {
    raw.parse::<u32>().map_err(|_| {
        RentalError::InvalidInput(format!(
            "{} must be a non-negative whole number, got '{}'",
            name, raw
        ))
    })
}

fn parse_discount(raw: String) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| {
            RentalError::InvalidInput(format!(
                "descuento must be a non-negative decimal, got '{}'",
                raw
            ))
        })
}

/// Accepts new rentals into the file store
pub struct RentalIntake {
    store: FileRecordStore,
}

impl RentalIntake {
    pub fn new(store: FileRecordStore) -> Self {
        Self { store }
    }

    /// Validate the form and append it
    ///
    /// # Returns
    /// * `Ok(RentalRecord)` - The stored record, id included
    /// * `Err(RentalError::InvalidInput)` - Bad form; the store wasn't touched
    pub async fn submit(&self, form: RentalForm) -> Result<RentalRecord> {
        let record = form.into_record().inspect_err(|e| {
            tracing::warn!(error = %e, "rejected rental form");
        })?;

        self.store.append(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn form() -> RentalForm {
        RentalForm {
            co2_rating: Some("54".to_string()),
            engine: Some("Hybrid".to_string()),
            dias_alquiler: Some("3".to_string()),
            num_vehi: Some("2".to_string()),
            descuento: Some(" 12.5 ".to_string()),
        }
    }

    #[test]
    fn test_valid_form() {
        let record = form().into_record().unwrap();
        assert_eq!(record, RentalRecord::new("54", "Hybrid", 3, 2, 12.5));
    }

    #[test]
    fn test_missing_fields() {
        let mut missing_engine = form();
        missing_engine.engine = None;
        assert!(matches!(
            missing_engine.into_record(),
            Err(RentalError::InvalidInput(msg)) if msg.contains("engine")
        ));

        let mut blank_discount = form();
        blank_discount.descuento = Some("   ".to_string());
        assert!(matches!(
            blank_discount.into_record(),
            Err(RentalError::InvalidInput(msg)) if msg.contains("descuento")
        ));
    }

    #[test]
    fn test_unparsable_numbers() {
        let mut bad_discount = form();
        bad_discount.descuento = Some("ten".to_string());
        assert!(matches!(bad_discount.into_record(), Err(RentalError::InvalidInput(_))));

        let mut negative_discount = form();
        negative_discount.descuento = Some("-1".to_string());
        assert!(matches!(negative_discount.into_record(), Err(RentalError::InvalidInput(_))));

        let mut nan_discount = form();
        nan_discount.descuento = Some("NaN".to_string());
        assert!(matches!(nan_discount.into_record(), Err(RentalError::InvalidInput(_))));

        let mut negative_days = form();
        negative_days.dias_alquiler = Some("-2".to_string());
        assert!(matches!(negative_days.into_record(), Err(RentalError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_submit_appends() {
        let temp = TempDir::new().unwrap();
        let store = FileRecordStore::new(temp.path().join("rentals.json"));
        let intake = RentalIntake::new(store.clone());

        let stored = intake.submit(form()).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_rejected_form_does_not_touch_store() {
        let temp = TempDir::new().unwrap();
        let store = FileRecordStore::new(temp.path().join("rentals.json"));
        let intake = RentalIntake::new(store.clone());

        let mut bad = form();
        bad.descuento = None;

        assert!(intake.submit(bad).await.is_err());
        assert!(!store.path().exists());
    }
}
