use crate::domain::model::MedicineRecord;

/// Case-insensitive substring search over name, batch number, manufacturer and IPFS hash.
///
/// An empty query returns every record; order is preserved.
pub fn search_medicines<'a>(medicines: &'a [MedicineRecord], query: &str) -> Vec<&'a MedicineRecord> {
    if query.is_empty() {
        return medicines.iter().collect();
    }
    let needle = query.to_lowercase();

    medicines
        .iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&needle)
                || m.batch_number.to_lowercase().contains(&needle)
                || m.manufacturer.to_lowercase().contains(&needle)
                || m
                    .ipfs_hash
                    .as_deref()
                    .is_some_and(|h| h.to_lowercase().contains(&needle))
        })
        .collect()
}
