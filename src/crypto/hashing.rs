// Digests for QR payloads and identifiers for transaction log entries.

use rand::Rng;
use sha2::{Digest, Sha256};

// Prefixed to every payload before hashing.
const PAYLOAD_DOMAIN: &[u8] = b"MEDIQRPAYLOAD";

/// Hex SHA-256 digest of a QR payload.
pub fn payload_digest(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(PAYLOAD_DOMAIN);
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

/// A random `0x`-prefixed, 20-byte hex hash for a transaction log entry.
pub fn transaction_hash() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}
