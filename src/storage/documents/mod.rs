//! Document store for medicine metadata.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMedicineStore;
pub use postgres::PostgresMedicineStore;

/// A persisted medicine document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedicine {
    pub id: String,
    pub name: String,
    pub batch_number: String,
    pub manufacturer_address: Option<String>,
    /// Expiry date as submitted.
    pub expiry_date: Option<String>,
    pub ipfs_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new document. `id` and `created_at` are assigned when absent.
#[derive(Debug, Clone)]
pub struct NewMedicineDocument {
    pub id: Option<String>,
    pub name: String,
    pub batch_number: String,
    pub manufacturer_address: Option<String>,
    pub expiry_date: Option<String>,
    pub ipfs_hash: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewMedicineDocument {
    fn into_stored(self) -> StoredMedicine {
        StoredMedicine {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name,
            batch_number: self.batch_number,
            manufacturer_address: self.manufacturer_address,
            expiry_date: self.expiry_date,
            ipfs_hash: self.ipfs_hash,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[async_trait]
pub trait MedicineStore: Send + Sync {
    /// Inserts a document, replacing any existing document with the same id. A replaced
    /// document keeps its original `created_at`.
    async fn upsert(&self, doc: NewMedicineDocument) -> anyhow::Result<StoredMedicine>;

    /// All documents, newest first.
    async fn list_newest_first(&self) -> anyhow::Result<Vec<StoredMedicine>>;

    /// Connectivity check.
    async fn ping(&self) -> anyhow::Result<()>;
}
