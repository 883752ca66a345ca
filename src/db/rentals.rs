/// Rentals table
///
/// Mirrors the file store's records as rows keyed by an autoincrement id.
/// Schema creation and seeding are idempotent and safe to run on every
/// request, including several first requests racing each other.

use crate::db::models::{RecordCollection, RentalRecord};
use crate::db::Database;
use crate::error::Result;
use sqlx::{Sqlite, Transaction};

const CREATE_RENTALS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS rentals (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        engine TEXT NOT NULL,
        num_vehi INTEGER NOT NULL,
        co2_rating TEXT NOT NULL,
        descuento REAL NOT NULL,
        dias_alquiler INTEGER NOT NULL
    )
"#;

// Starter rows. Only ever inserted into an empty table; the NOT EXISTS guard
// plus the immediate transaction keep concurrent callers from inserting twice.
const SEED_RENTALS: &str = r#"
    INSERT INTO rentals (engine, num_vehi, co2_rating, descuento, dias_alquiler)
    SELECT column1, column2, column3, column4, column5
    FROM (VALUES
        ('Hybrid', 1, '54', 12.0, 1),
        ('Electric', 2, '71', 23.0, 3),
        ('Hybrid', 1, '54', 0.0, 1),
        ('Hybrid', 1, '71', 0.0, 1),
        ('Electric', 1, '139', 0.0, 1),
        ('Hybrid', 1, '54', 0.0, 1),
        ('Hybrid', 1, '71', 0.0, 1),
        ('Hybrid', 1, '54', 0.0, 1),
        ('Hybrid', 1, '54', 0.0, 1),
        ('Hybrid', 1, '54', 0.0, 1),
        ('Hybrid', 1, '54', 0.0, 1),
        ('Hybrid', 1, '54', 0.0, 1)
    )
    WHERE NOT EXISTS (SELECT 1 FROM rentals)
"#;

/// Number of rows the seed inserts into an empty table
pub const SEED_ROW_COUNT: u64 = 12;

/// Rental records stored as rows of the `rentals` table
#[derive(Clone)]
pub struct TableRecordStore {
    db: Database,
}

impl TableRecordStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create the rentals table if it doesn't exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        let mut tx = begin_immediate(&self.db).await?;
        sqlx::query(CREATE_RENTALS_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Insert the starter rows if the table is empty
    ///
    /// # Returns
    /// * `Ok(n)` - Rows inserted: `SEED_ROW_COUNT` on the first call, 0 after
    pub async fn seed_if_empty(&self) -> Result<u64> {
        let mut tx = begin_immediate(&self.db).await?;
        let inserted = sqlx::query(SEED_RENTALS)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;

        if inserted > 0 {
            tracing::info!(rows = inserted, "seeded rentals table");
        }
        Ok(inserted)
    }

    /// Schema and seed in one go, as every listing request does
    pub async fn prepare(&self) -> Result<()> {
        self.ensure_schema().await?;
        self.seed_if_empty().await?;
        Ok(())
    }

    /// Insert a record and return it with its new id
    pub async fn append(&self, record: RentalRecord) -> Result<RentalRecord> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO rentals (engine, num_vehi, co2_rating, descuento, dias_alquiler)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&record.engine)
        .bind(record.unit_count)
        .bind(&record.co2_rating)
        .bind(record.discount)
        .bind(record.rental_days)
        .fetch_one(self.db.pool())
        .await?;

        tracing::info!(id, engine = %record.engine, "rental row inserted");
        Ok(record.with_id(id))
    }

    /// Every row, ordered by id
    pub async fn list_all(&self) -> Result<RecordCollection> {
        let rows = sqlx::query_as::<_, RentalRecord>(
            "SELECT id, engine, num_vehi, co2_rating, descuento, dias_alquiler FROM rentals ORDER BY id",
        )
        .fetch_all(self.db.pool())
        .await?;

        tracing::debug!(rows = rows.len(), "listed rentals table");
        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rentals")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count.0)
    }
}

/// Open a transaction that takes SQLite's write lock up front, so concurrent
/// writers queue on the busy timeout instead of failing with SQLITE_BUSY.
/// Dropping the transaction without committing rolls it back.
async fn begin_immediate(db: &Database) -> Result<Transaction<'static, Sqlite>> {
    Ok(db.pool().begin_with("BEGIN IMMEDIATE").await?)
}
