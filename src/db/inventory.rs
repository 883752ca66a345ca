/// Car inventory (`cars` table)
///
/// Separate from the rentals table; this is what the chatbot answers from.

use crate::chat::InventorySource;
use crate::db::models::{CarInventoryRow, NewCar};
use crate::db::Database;
use crate::error::{RentalError, Result};

const CREATE_CARS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS cars (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        make TEXT NOT NULL,
        model TEXT NOT NULL,
        year INTEGER NOT NULL,
        available BOOLEAN NOT NULL DEFAULT 1,
        price_per_day REAL NOT NULL
    )
"#;

#[derive(Clone)]
pub struct CarInventory {
    db: Database,
}

impl CarInventory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_CARS_TABLE).execute(self.db.pool()).await?;
        Ok(())
    }

    /// Add a car and return its row
    pub async fn add_car(&self, car: NewCar) -> Result<CarInventoryRow> {
        if car.make.trim().is_empty() || car.model.trim().is_empty() {
            return Err(RentalError::InvalidInput(
                "make and model are required".to_string(),
            ));
        }
        if !car.price_per_day.is_finite() || car.price_per_day < 0.0 {
            return Err(RentalError::InvalidInput(format!(
                "price per day must be a non-negative number, got {}",
                car.price_per_day
            )));
        }

        let row = sqlx::query_as::<_, CarInventoryRow>(
            r#"
            INSERT INTO cars (make, model, year, available, price_per_day)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, make, model, year, available, price_per_day
            "#,
        )
        .bind(car.make.trim())
        .bind(car.model.trim())
        .bind(car.year)
        .bind(car.available)
        .bind(car.price_per_day)
        .fetch_one(self.db.pool())
        .await?;

        tracing::info!(id = row.id, make = %row.make, model = %row.model, "car added");
        Ok(row)
    }
}

impl InventorySource for CarInventory {
    async fn available_cars(&self) -> Result<Vec<CarInventoryRow>> {
        let cars = sqlx::query_as::<_, CarInventoryRow>(
            "SELECT id, make, model, year, available, price_per_day FROM cars WHERE available = 1 ORDER BY id",
        )
        .fetch_all(self.db.pool())
        .await?;

        tracing::debug!(cars = cars.len(), "queried available cars");
        Ok(cars)
    }
}
