//! Line-oriented QR payload:
//!
//! ```text
//! Name: <name>
//! Batch: <batch number>
//! Manufacturer: <manufacturer address>
//! Expiry: <YYYY-MM-DD>
//! ```

use chrono::NaiveDate;

use crate::domain::errors::RegistryError;
use crate::domain::model::MedicineFields;

pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

const NAME_LABEL: &str = "Name";
const BATCH_LABEL: &str = "Batch";
const MANUFACTURER_LABEL: &str = "Manufacturer";
const EXPIRY_LABEL: &str = "Expiry";

pub fn encode_payload(fields: &MedicineFields) -> String {
    format!(
        "{}: {}\n{}: {}\n{}: {}\n{}: {}",
        NAME_LABEL,
        fields.name,
        BATCH_LABEL,
        fields.batch_number,
        MANUFACTURER_LABEL,
        fields.manufacturer,
        EXPIRY_LABEL,
        fields.expiry_date.format(EXPIRY_FORMAT)
    )
}

pub fn parse_expiry(raw: &str) -> Result<NaiveDate, RegistryError> {
    NaiveDate::parse_from_str(raw.trim(), EXPIRY_FORMAT).map_err(|_| {
        RegistryError::validation(format!(
            "expiry date '{}' is not a calendar date (expected YYYY-MM-DD)",
            raw
        ))
    })
}

/// Parses scanned text back into the four fields.
///
/// Lines must appear in the encoded order; CRLF line endings and trailing blank lines are
/// tolerated.
pub fn parse_payload(text: &str) -> Result<MedicineFields, RegistryError> {
    let mut lines = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let mut field = |label: &str| -> Result<String, RegistryError> {
        let line = lines
            .next()
            .ok_or_else(|| RegistryError::validation(format!("missing '{}' line", label)))?;
        let value = line
            .strip_prefix(label)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| {
                RegistryError::validation(format!("expected '{}:' line, got '{}'", label, line))
            })?;
        Ok(value.trim().to_string())
    };

    let name = field(NAME_LABEL)?;
    let batch_number = field(BATCH_LABEL)?;
    let manufacturer = field(MANUFACTURER_LABEL)?;
    let expiry_raw = field(EXPIRY_LABEL)?;

    if lines.next().is_some() {
        return Err(RegistryError::validation("unexpected trailing lines in payload"));
    }

    validate_fields(name, batch_number, &expiry_raw, manufacturer)
}

/// Validates raw user input into `MedicineFields`.
pub fn validate_fields(
    name: String,
    batch_number: String,
    expiry_date: &str,
    manufacturer: String,
) -> Result<MedicineFields, RegistryError> {
    let name = required("name", name)?;
    let batch_number = required("batch number", batch_number)?;
    let manufacturer = required("manufacturer address", manufacturer)?;
    let expiry_date = parse_expiry(expiry_date)?;
    Ok(MedicineFields {
        name,
        batch_number,
        expiry_date,
        manufacturer,
    })
}

fn required(label: &str, value: String) -> Result<String, RegistryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RegistryError::validation(format!("{} is required", label)));
    }
    // Each field occupies exactly one payload line.
    if value.contains(['\n', '\r']) {
        return Err(RegistryError::validation(format!(
            "{} must not contain line breaks",
            label
        )));
    }
    Ok(value.to_string())
}
