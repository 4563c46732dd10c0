pub mod config;
pub mod pinata;
pub mod wallet;
