pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::pipeline::{RegistrationInput, RegistrationPipeline};
pub use app::state::{AppSnapshot, AppStore};
pub use domain::model::{MedicineRecord, RegistrationStage, TransactionLogEntry};
pub use domain::RegistryError;
pub use infra::pinata::{PinataClient, PinataCredentials, PinningService};
pub use infra::wallet::{SimulatedWallet, WalletProvider};
pub use storage::{InMemoryMedicineStore, MedicineStore, PostgresMedicineStore};
