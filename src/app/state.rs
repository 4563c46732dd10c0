//! Application state.
//!
//! `AppSnapshot` is a plain value; every mutation is an `Action` applied by the pure
//! `AppSnapshot::reduce`. `AppStore` owns the current snapshot behind an async lock and is
//! shared by reference with whatever needs it.

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::errors::RegistryError;
use crate::domain::model::{
    AuthSession, MedicineRecord, PipelineStep, RegistrationStage, TransactionLogEntry,
    TransactionStatus, UserRole, WalletConnection,
};
use crate::domain::search::search_medicines;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSnapshot {
    pub auth: AuthSession,
    pub wallet: WalletConnection,
    /// Registration order.
    pub medicines: Vec<MedicineRecord>,
    /// Newest first.
    pub transactions: Vec<TransactionLogEntry>,
}

#[derive(Debug, Clone)]
pub enum Action {
    LoggedIn(UserRole),
    LoggedOut,
    WalletConnected(WalletConnection),
    WalletDisconnected,
    MedicineCreated(MedicineRecord),
    QrEncoded {
        id: String,
        payload: String,
        image: String,
        digest: String,
    },
    Published {
        id: String,
        ipfs_hash: String,
    },
    Finalized {
        id: String,
    },
    StageFailed {
        id: String,
        at: PipelineStep,
        reason: String,
    },
    TaggedExpired {
        id: String,
    },
    TransactionLogged(TransactionLogEntry),
}

impl AppSnapshot {
    pub fn with_seed(medicines: Vec<MedicineRecord>, transactions: Vec<TransactionLogEntry>) -> Self {
        Self {
            medicines,
            transactions,
            ..Self::default()
        }
    }

    /// Applies `action`, returning the next state. Actions naming an unknown record are no-ops.
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::LoggedIn(role) => {
                self.auth = AuthSession {
                    is_authenticated: true,
                    role: Some(role),
                };
            }
            Action::LoggedOut => self.auth = AuthSession::default(),
            Action::WalletConnected(wallet) => self.wallet = wallet,
            Action::WalletDisconnected => self.wallet = WalletConnection::default(),
            Action::MedicineCreated(record) => self.medicines.push(record),
            Action::QrEncoded {
                id,
                payload,
                image,
                digest,
            } => {
                if let Some(m) = self.medicine_mut(&id) {
                    m.qr_payload = Some(payload);
                    m.qr_code = Some(image);
                    m.payload_digest = Some(digest);
                    m.stage = RegistrationStage::Encoded;
                }
            }
            Action::Published { id, ipfs_hash } => {
                if let Some(m) = self.medicine_mut(&id) {
                    m.ipfs_hash = Some(ipfs_hash);
                    m.stage = RegistrationStage::Published;
                }
            }
            Action::Finalized { id } => {
                if let Some(m) = self.medicine_mut(&id) {
                    m.stage = RegistrationStage::Finalized;
                }
            }
            Action::StageFailed { id, at, reason } => {
                if let Some(m) = self.medicine_mut(&id) {
                    m.stage = RegistrationStage::Failed { at, reason };
                }
            }
            Action::TaggedExpired { id } => {
                if let Some(m) = self.medicine_mut(&id) {
                    m.expired = true;
                }
            }
            Action::TransactionLogged(entry) => self.transactions.insert(0, entry),
        }
        self
    }

    fn medicine_mut(&mut self, id: &str) -> Option<&mut MedicineRecord> {
        self.medicines.iter_mut().find(|m| m.id == id)
    }

    pub fn medicine(&self, id: &str) -> Option<&MedicineRecord> {
        self.medicines.iter().find(|m| m.id == id)
    }

    /// The record carrying `batch_number`, preferring a non-expired one over expired ones.
    pub fn medicine_by_batch(&self, batch_number: &str) -> Option<&MedicineRecord> {
        self.medicines
            .iter()
            .filter(|m| m.batch_number == batch_number)
            .min_by_key(|m| m.expired)
    }

    /// True when a non-expired record already carries `batch_number`.
    pub fn has_active_batch(&self, batch_number: &str) -> bool {
        self.medicines
            .iter()
            .any(|m| !m.expired && m.batch_number == batch_number)
    }
}

/// Shared owner of the current `AppSnapshot`.
#[derive(Default)]
pub struct AppStore {
    inner: RwLock<AppSnapshot>,
}

impl AppStore {
    pub fn new(initial: AppSnapshot) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    pub async fn dispatch(&self, action: Action) {
        let mut guard = self.inner.write().await;
        let current = std::mem::take(&mut *guard);
        *guard = current.reduce(action);
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        self.inner.read().await.clone()
    }

    /// Runs `f` against the current snapshot under the read lock, without cloning it.
    pub async fn read<R>(&self, f: impl FnOnce(&AppSnapshot) -> R) -> R {
        let guard = self.inner.read().await;
        f(&*guard)
    }

    /// Stores a freshly created record unless an active record already uses its batch number.
    ///
    /// The check and the insert happen under one write lock.
    pub async fn insert_medicine(&self, record: MedicineRecord) -> Result<(), RegistryError> {
        let mut guard = self.inner.write().await;
        if guard.has_active_batch(&record.batch_number) {
            return Err(RegistryError::DuplicateBatch {
                batch_number: record.batch_number,
            });
        }
        let current = std::mem::take(&mut *guard);
        *guard = current.reduce(Action::MedicineCreated(record));
        Ok(())
    }

    pub async fn medicine(&self, id: &str) -> Option<MedicineRecord> {
        self.inner.read().await.medicine(id).cloned()
    }

    pub async fn medicine_by_batch(&self, batch_number: &str) -> Option<MedicineRecord> {
        self.inner.read().await.medicine_by_batch(batch_number).cloned()
    }

    pub async fn search(&self, query: &str) -> Vec<MedicineRecord> {
        let guard = self.inner.read().await;
        search_medicines(&guard.medicines, query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn transactions(&self) -> Vec<TransactionLogEntry> {
        self.inner.read().await.transactions.clone()
    }

    pub async fn auth(&self) -> AuthSession {
        self.inner.read().await.auth.clone()
    }

    pub async fn wallet(&self) -> WalletConnection {
        self.inner.read().await.wallet.clone()
    }

    pub async fn login(&self, role: UserRole) -> AuthSession {
        self.dispatch(Action::LoggedIn(role)).await;
        self.auth().await
    }

    pub async fn logout(&self) {
        self.dispatch(Action::LoggedOut).await;
    }

    pub async fn require_admin(&self) -> Result<(), RegistryError> {
        if self.auth().await.is_admin() {
            Ok(())
        } else {
            Err(RegistryError::Forbidden)
        }
    }

    /// Appends a log entry and returns it.
    pub async fn log(
        &self,
        status: TransactionStatus,
        message: impl Into<String>,
    ) -> TransactionLogEntry {
        let entry = TransactionLogEntry::new(status, message);
        debug!(status = ?entry.status, message = %entry.message, "transaction logged");
        self.dispatch(Action::TransactionLogged(entry.clone())).await;
        entry
    }

    /// Tags a record as expired. Tagging an already expired record is a no-op apart from the
    /// log entry.
    pub async fn tag_expired(&self, id: &str) -> Result<MedicineRecord, RegistryError> {
        if self.medicine(id).await.is_none() {
            return Err(RegistryError::NotFound { id: id.to_string() });
        }
        self.dispatch(Action::TaggedExpired { id: id.to_string() }).await;
        self.log(TransactionStatus::Success, "Medicine tagged as expired")
            .await;
        self.medicine(id)
            .await
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{sample_medicines, sample_transactions, MedicineFields};
    use chrono::NaiveDate;

    fn record(batch: &str) -> MedicineRecord {
        MedicineRecord::create(MedicineFields {
            name: "Cetirizine".to_string(),
            batch_number: batch.to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2031, 3, 1).unwrap(),
            manufacturer: "0xfeed".to_string(),
        })
    }

    #[test]
    fn reduce_does_not_touch_the_input_snapshot() {
        let before = AppSnapshot::with_seed(sample_medicines(), vec![]);
        let after = before.clone().reduce(Action::TaggedExpired { id: "1".to_string() });
        assert!(!before.medicine("1").unwrap().expired);
        assert!(after.medicine("1").unwrap().expired);
    }

    #[test]
    fn transactions_are_prepended() {
        let snap = AppSnapshot::with_seed(vec![], sample_transactions());
        let entry = TransactionLogEntry::new(TransactionStatus::Pending, "queued");
        let snap = snap.reduce(Action::TransactionLogged(entry.clone()));
        assert_eq!(snap.transactions.len(), 4);
        assert_eq!(snap.transactions[0], entry);
    }

    #[test]
    fn stage_transitions_follow_actions() {
        let rec = record("CET-1");
        let id = rec.id.clone();
        let snap = AppSnapshot::default()
            .reduce(Action::MedicineCreated(rec))
            .reduce(Action::QrEncoded {
                id: id.clone(),
                payload: "p".into(),
                image: "data:image/png;base64,AA==".into(),
                digest: "d".into(),
            })
            .reduce(Action::StageFailed {
                id: id.clone(),
                at: PipelineStep::Publish,
                reason: "timeout".into(),
            });
        let m = snap.medicine(&id).unwrap();
        assert_eq!(m.stage.next_step(), Some(PipelineStep::Publish));
        assert_eq!(m.qr_payload.as_deref(), Some("p"));

        let snap = snap
            .reduce(Action::Published {
                id: id.clone(),
                ipfs_hash: "QmX".into(),
            })
            .reduce(Action::Finalized { id: id.clone() });
        assert!(snap.medicine(&id).unwrap().stage.is_finalized());
    }

    #[tokio::test]
    async fn tagging_expired_twice_is_idempotent() {
        let store = AppStore::new(AppSnapshot::with_seed(sample_medicines(), vec![]));
        store.tag_expired("3").await.unwrap();
        let rec = store.tag_expired("3").await.unwrap();
        assert!(rec.expired);

        let snap = store.snapshot().await;
        assert_eq!(snap.medicines.len(), 3);
        assert_eq!(snap.medicines.iter().filter(|m| m.id == "3").count(), 1);
        assert!(matches!(
            store.tag_expired("missing").await,
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn duplicate_active_batch_is_rejected() {
        let store = AppStore::default();
        store.insert_medicine(record("CET-1")).await.unwrap();
        let err = store.insert_medicine(record("CET-1")).await.unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateBatch { .. }));

        // Once the first batch is expired the number can be reused.
        let first = store.medicine_by_batch("CET-1").await.unwrap();
        store.tag_expired(&first.id).await.unwrap();
        let fresh = record("CET-1");
        let fresh_id = fresh.id.clone();
        store.insert_medicine(fresh).await.unwrap();
        assert_eq!(store.snapshot().await.medicines.len(), 2);

        // Lookup by batch prefers the active record over the older expired one.
        let found = store.medicine_by_batch("CET-1").await.unwrap();
        assert_eq!(found.id, fresh_id);
        assert!(!found.expired);
    }

    #[tokio::test]
    async fn admin_gate_follows_session() {
        let store = AppStore::default();
        assert!(store.require_admin().await.is_err());
        store.login(UserRole::User).await;
        assert!(store.require_admin().await.is_err());
        store.login(UserRole::Admin).await;
        assert!(store.require_admin().await.is_ok());
        store.logout().await;
        assert!(!store.auth().await.is_authenticated);
    }
}
