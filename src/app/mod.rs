pub mod pipeline;
pub mod state;
pub mod verification;
pub mod wallet;
