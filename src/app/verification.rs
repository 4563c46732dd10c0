//! Scan verification.
//!
//! A scanned payload is genuine when a registered record with the same batch number carries
//! the same payload digest. The record is then reported `expired` or `valid`.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::app::state::{AppSnapshot, AppStore};
use crate::crypto::hashing::payload_digest;
use crate::domain::model::{MedicineRecord, TransactionStatus};
use crate::domain::payload::{encode_payload, parse_payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Valid,
    Expired,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub is_valid: bool,
    pub status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub medicine: Option<MedicineRecord>,
}

impl ScanResult {
    fn invalid() -> Self {
        Self {
            is_valid: false,
            status: ScanStatus::Invalid,
            medicine: None,
        }
    }
}

/// Evaluates `scanned` against `snapshot` as of `today`.
pub fn evaluate_scan(snapshot: &AppSnapshot, scanned: &str, today: NaiveDate) -> ScanResult {
    let Ok(fields) = parse_payload(scanned) else {
        return ScanResult::invalid();
    };
    // Re-encode so formatting differences (CRLF, padding) do not change the digest.
    let digest = payload_digest(&encode_payload(&fields));

    // A batch number may be reused once its old record expires; the active record wins.
    let matched = snapshot
        .medicines
        .iter()
        .filter(|m| {
            m.batch_number == fields.batch_number
                && m.payload_digest.as_deref() == Some(digest.as_str())
        })
        .min_by_key(|m| m.is_expired_on(today));

    match matched {
        Some(m) if m.is_expired_on(today) => ScanResult {
            is_valid: false,
            status: ScanStatus::Expired,
            medicine: Some(m.clone()),
        },
        Some(m) => ScanResult {
            is_valid: true,
            status: ScanStatus::Valid,
            medicine: Some(m.clone()),
        },
        None => ScanResult::invalid(),
    }
}

/// Verifies a scan against the current state and logs the outcome.
pub async fn verify_scan(store: &AppStore, scanned: &str) -> ScanResult {
    let today = Utc::now().date_naive();
    let result = store.read(|snapshot| evaluate_scan(snapshot, scanned, today)).await;
    info!(status = ?result.status, "QR code scanned");

    let (status, message) = match result.status {
        ScanStatus::Valid => (TransactionStatus::Success, "QR code scanned successfully"),
        ScanStatus::Expired => (TransactionStatus::Fail, "Scanned medicine is expired"),
        ScanStatus::Invalid => (TransactionStatus::Fail, "Scanned QR code could not be verified"),
    };
    store.log(status, message).await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::sample_medicines;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn seeded() -> AppSnapshot {
        AppSnapshot::with_seed(sample_medicines(), vec![])
    }

    #[test]
    fn registered_payload_is_valid() {
        let snap = seeded();
        let payload = snap.medicine("3").unwrap().qr_payload.clone().unwrap();
        let result = evaluate_scan(&snap, &payload, today());
        assert_eq!(result.status, ScanStatus::Valid);
        assert!(result.is_valid);
        assert_eq!(result.medicine.unwrap().name, "Ibuprofen");
    }

    #[test]
    fn tagged_or_past_expiry_is_expired() {
        let snap = seeded();
        let tagged = snap.medicine("2").unwrap().qr_payload.clone().unwrap();
        assert_eq!(evaluate_scan(&snap, &tagged, today()).status, ScanStatus::Expired);

        let ibuprofen = snap.medicine("3").unwrap().qr_payload.clone().unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert_eq!(evaluate_scan(&snap, &ibuprofen, later).status, ScanStatus::Expired);
    }

    #[test]
    fn reused_batch_scans_as_the_active_record() {
        let mut old = seeded().medicine("3").unwrap().clone();
        old.expired = true;
        let mut fresh = old.clone();
        fresh.id = "4".to_string();
        fresh.expired = false;
        let payload = fresh.qr_payload.clone().unwrap();
        let snap = AppSnapshot::with_seed(vec![old, fresh], vec![]);

        let result = evaluate_scan(&snap, &payload, today());
        assert_eq!(result.status, ScanStatus::Valid);
        assert_eq!(result.medicine.unwrap().id, "4");
    }

    #[test]
    fn tampered_or_unknown_payload_is_invalid() {
        let snap = seeded();
        let payload = snap.medicine("1").unwrap().qr_payload.clone().unwrap();
        let tampered = payload.replace("2025-01-01", "2029-01-01");
        assert_eq!(evaluate_scan(&snap, &tampered, today()).status, ScanStatus::Invalid);
        assert_eq!(evaluate_scan(&snap, "MED_abc123", today()).status, ScanStatus::Invalid);
        assert!(evaluate_scan(&snap, "", today()).medicine.is_none());
    }
}
