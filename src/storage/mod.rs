pub mod documents;

pub use documents::{InMemoryMedicineStore, MedicineStore, NewMedicineDocument, PostgresMedicineStore, StoredMedicine};
