use thiserror::Error;

use crate::domain::model::PipelineStep;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("A medicine with batch number '{batch_number}' is already registered")]
    DuplicateBatch { batch_number: String },

    #[error("Medicine not found: {id}")]
    NotFound { id: String },

    #[error("Admin session required")]
    Forbidden,

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("IPFS upload failed: {0}")]
    Publish(String),

    #[error("Document store write failed: {0}")]
    Persist(String),
}

impl RegistryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Wraps a collaborator failure in the variant matching the pipeline step it happened in.
    pub fn at_step(step: PipelineStep, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        match step {
            PipelineStep::Encode => Self::Encode(reason),
            PipelineStep::Publish => Self::Publish(reason),
            PipelineStep::Finalize => Self::Persist(reason),
        }
    }
}
