use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The molecule description was blank after trimming.
    #[error("Please enter a molecule description")]
    EmptyInput,

    /// A proceed/test action arrived before a drug was created.
    #[error("No drug has been created yet")]
    MissingDrug,

    /// An action that the current wizard step does not offer.
    #[error("'{action}' is not available in the {phase} step")]
    InvalidTransition { action: &'static str, phase: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The numeric model or another collaborator failed.
    #[error("Collaborator failure: {0}")]
    CollaboratorFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// True for guard errors the wizard recovers from locally with no state change.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SimError::EmptyInput | SimError::MissingDrug | SimError::InvalidTransition { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
