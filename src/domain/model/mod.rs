//! Domain model: medicine records, the transaction log, and the wallet/auth singletons.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod samples;

pub use samples::{sample_medicines, sample_transactions};

/// A pipeline step that talks to a collaborator after the record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStep {
    Encode,
    Publish,
    Finalize,
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PipelineStep::Encode => "encode",
            PipelineStep::Publish => "publish",
            PipelineStep::Finalize => "finalize",
        };
        f.write_str(s)
    }
}

/// Registration state machine, persisted on each record.
///
/// `Created -> Encoded -> Published -> Finalized`; any collaborator step may move the
/// record to `Failed`, from which it can be resumed at the step that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RegistrationStage {
    Created,
    Encoded,
    Published,
    Finalized,
    Failed { at: PipelineStep, reason: String },
}

impl RegistrationStage {
    /// The step that must run next, or `None` once the record is finalized.
    pub fn next_step(&self) -> Option<PipelineStep> {
        match self {
            RegistrationStage::Created => Some(PipelineStep::Encode),
            RegistrationStage::Encoded => Some(PipelineStep::Publish),
            RegistrationStage::Published => Some(PipelineStep::Finalize),
            RegistrationStage::Finalized => None,
            RegistrationStage::Failed { at, .. } => Some(*at),
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, RegistrationStage::Finalized)
    }
}

/// The four user-entered fields, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineFields {
    pub name: String,
    pub batch_number: String,
    pub expiry_date: NaiveDate,
    pub manufacturer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRecord {
    pub id: String,
    pub name: String,
    pub batch_number: String,
    pub expiry_date: NaiveDate,
    /// Manufacturer wallet address.
    pub manufacturer: String,
    pub ipfs_hash: Option<String>,
    /// PNG data URL of the rendered QR code.
    pub qr_code: Option<String>,
    /// Text encoded into the QR code.
    pub qr_payload: Option<String>,
    pub payload_digest: Option<String>,
    pub stage: RegistrationStage,
    pub expired: bool,
    pub created_at: DateTime<Utc>,
}

impl MedicineRecord {
    /// Fresh record in the `Created` stage with a new id and timestamp.
    pub fn create(fields: MedicineFields) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name,
            batch_number: fields.batch_number,
            expiry_date: fields.expiry_date,
            manufacturer: fields.manufacturer,
            ipfs_hash: None,
            qr_code: None,
            qr_payload: None,
            payload_digest: None,
            stage: RegistrationStage::Created,
            expired: false,
            created_at: Utc::now(),
        }
    }

    pub fn fields(&self) -> MedicineFields {
        MedicineFields {
            name: self.name.clone(),
            batch_number: self.batch_number.clone(),
            expiry_date: self.expiry_date,
            manufacturer: self.manufacturer.clone(),
        }
    }

    /// Expired either by tag or by calendar.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expired || self.expiry_date < today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Fail,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLogEntry {
    pub id: String,
    pub hash: String,
    pub status: TransactionStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl TransactionLogEntry {
    pub fn new(status: TransactionStatus, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            hash: crate::crypto::hashing::transaction_hash(),
            status,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnection {
    pub address: String,
    pub balance: String,
    pub is_connected: bool,
}

impl Default for WalletConnection {
    fn default() -> Self {
        Self {
            address: String::new(),
            balance: "0".to_string(),
            is_connected: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub is_authenticated: bool,
    pub role: Option<UserRole>,
}

impl AuthSession {
    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.role == Some(UserRole::Admin)
    }
}
