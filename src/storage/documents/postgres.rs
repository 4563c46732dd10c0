//! Persistent document store implementation using PostgreSQL.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use super::{MedicineStore, NewMedicineDocument, StoredMedicine};

/// A document store backed by the `medicines` table.
#[derive(Clone)]
pub struct PostgresMedicineStore {
    pool: PgPool,
}

impl PostgresMedicineStore {
    /// Connects and creates the `medicines` table if needed.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS medicines (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                batch_number TEXT NOT NULL,
                manufacturer_address TEXT,
                expiry_date TEXT,
                ipfs_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS medicines_batch_number_idx ON medicines (batch_number)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_medicine(row: &PgRow) -> Result<StoredMedicine> {
        Ok(StoredMedicine {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            batch_number: row.try_get("batch_number")?,
            manufacturer_address: row.try_get("manufacturer_address")?,
            expiry_date: row.try_get("expiry_date")?,
            ipfs_hash: row.try_get("ipfs_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl MedicineStore for PostgresMedicineStore {
    async fn upsert(&self, doc: NewMedicineDocument) -> Result<StoredMedicine> {
        let doc = doc.into_stored();
        let row = sqlx::query(
            "INSERT INTO medicines
                (id, name, batch_number, manufacturer_address, expiry_date, ipfs_hash, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                batch_number = EXCLUDED.batch_number,
                manufacturer_address = EXCLUDED.manufacturer_address,
                expiry_date = EXCLUDED.expiry_date,
                ipfs_hash = EXCLUDED.ipfs_hash
             RETURNING id, name, batch_number, manufacturer_address, expiry_date, ipfs_hash, created_at",
        )
        .bind(&doc.id)
        .bind(&doc.name)
        .bind(&doc.batch_number)
        .bind(&doc.manufacturer_address)
        .bind(&doc.expiry_date)
        .bind(&doc.ipfs_hash)
        .bind(doc.created_at)
        .fetch_one(&self.pool)
        .await?;
        Self::row_to_medicine(&row)
    }

    async fn list_newest_first(&self) -> Result<Vec<StoredMedicine>> {
        let rows = sqlx::query(
            "SELECT id, name, batch_number, manufacturer_address, expiry_date, ipfs_hash, created_at
             FROM medicines ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_medicine).collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
