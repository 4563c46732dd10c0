pub mod errors;
pub mod model;
pub mod payload;
pub mod qr;
pub mod search;

pub use errors::RegistryError;
