//! Error types for the placeholder model.

use thiserror::Error;

use drugsim_common::SimError;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model construction failed: {0}")]
    Build(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Model step exceeded {0}s timeout")]
    Timeout(u64),

    #[error("Model step cancelled")]
    Cancelled,

    #[error("Model worker failed: {0}")]
    Worker(String),
}

impl From<candle_core::Error> for ModelError {
    fn from(e: candle_core::Error) -> Self {
        ModelError::Inference(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ModelError {
    fn from(e: tokio::task::JoinError) -> Self {
        ModelError::Worker(e.to_string())
    }
}

impl From<ModelError> for SimError {
    fn from(e: ModelError) -> Self {
        SimError::CollaboratorFailure(e.to_string())
    }
}
