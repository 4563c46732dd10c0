//! Demo seed data, loaded when `SEED_SAMPLE_DATA=true`.

use super::{
    MedicineFields, MedicineRecord, RegistrationStage, TransactionLogEntry, TransactionStatus,
};
use crate::crypto::hashing::payload_digest;
use crate::domain::payload::encode_payload;
use chrono::{DateTime, NaiveDate, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

fn sample(
    id: &str,
    fields: MedicineFields,
    ipfs_hash: &str,
    expired: bool,
    created_at: DateTime<Utc>,
) -> MedicineRecord {
    let payload = encode_payload(&fields);
    MedicineRecord {
        id: id.to_string(),
        name: fields.name,
        batch_number: fields.batch_number,
        expiry_date: fields.expiry_date,
        manufacturer: fields.manufacturer,
        ipfs_hash: Some(ipfs_hash.to_string()),
        qr_code: None,
        payload_digest: Some(payload_digest(&payload)),
        qr_payload: Some(payload),
        stage: RegistrationStage::Finalized,
        expired,
        created_at,
    }
}

pub fn sample_medicines() -> Vec<MedicineRecord> {
    vec![
        sample(
            "1",
            MedicineFields {
                name: "Paracetamol".to_string(),
                batch_number: "PARA2023001".to_string(),
                expiry_date: date(2025, 1, 1),
                manufacturer: "PharmaCorp Ltd.".to_string(),
            },
            "QmZ7Ld9Aqrzjrv4PGR7Uym4iHMxHLMAUYJTqL8sdhVhUMa",
            false,
            midnight(2023, 1, 1),
        ),
        sample(
            "2",
            MedicineFields {
                name: "Amoxicillin".to_string(),
                batch_number: "AMOX2023001".to_string(),
                expiry_date: date(2023, 1, 1),
                manufacturer: "MediPharm Inc.".to_string(),
            },
            "QmVrLdF9AqrzMrv4PGR7Uym4iHMxHLMAUYJTqL8sdhXYZb",
            true,
            midnight(2022, 1, 1),
        ),
        sample(
            "3",
            MedicineFields {
                name: "Ibuprofen".to_string(),
                batch_number: "IBUP2023001".to_string(),
                expiry_date: date(2024, 6, 1),
                manufacturer: "HealthPharm Ltd.".to_string(),
            },
            "QmZ7Ld9AqrzMpv4PGR7Uym4iHMxHLMAUYJTqL8sdhCDEf",
            false,
            midnight(2023, 2, 1),
        ),
    ]
}

/// Seed log, newest first.
pub fn sample_transactions() -> Vec<TransactionLogEntry> {
    let entry = |id: &str,
                 hash: &str,
                 status: TransactionStatus,
                 message: &str,
                 at: DateTime<Utc>| TransactionLogEntry {
        id: id.to_string(),
        hash: hash.to_string(),
        status,
        message: message.to_string(),
        timestamp: at,
    };
    vec![
        entry(
            "1",
            "0x1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1",
            TransactionStatus::Success,
            "Medicine QR code uploaded to IPFS",
            midnight(2023, 4, 15),
        ),
        entry(
            "2",
            "0x2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c",
            TransactionStatus::Fail,
            "Transaction failed due to network error",
            midnight(2023, 4, 14),
        ),
        entry(
            "3",
            "0x3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d",
            TransactionStatus::Success,
            "Medicine registered on blockchain",
            midnight(2023, 4, 13),
        ),
    ]
}
