use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MedicineStore, NewMedicineDocument, StoredMedicine};

/// Process-local store used when no `DATABASE_URL` is configured.
#[derive(Default)]
pub struct InMemoryMedicineStore {
    docs: RwLock<Vec<StoredMedicine>>,
}

impl InMemoryMedicineStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MedicineStore for InMemoryMedicineStore {
    async fn upsert(&self, doc: NewMedicineDocument) -> anyhow::Result<StoredMedicine> {
        let mut stored = doc.into_stored();
        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|d| d.id == stored.id) {
            Some(existing) => {
                stored.created_at = existing.created_at;
                *existing = stored.clone();
            }
            None => docs.push(stored.clone()),
        }
        Ok(stored)
    }

    async fn list_newest_first(&self) -> anyhow::Result<Vec<StoredMedicine>> {
        let mut docs = self.docs.read().await.clone();
        // Stable sort keeps insertion order among equal timestamps.
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(docs)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
