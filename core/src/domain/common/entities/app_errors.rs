use thiserror::Error;

use crate::domain::workflow::entities::{WorkflowAction, WorkflowStage};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("No image selected")]
    NoImageSelected,

    #[error("No items selected")]
    EmptySelection,

    #[error("Item '{0}' was not detected in the image")]
    UnknownItem(String),

    #[error("Action {action} is not allowed while {from}")]
    InvalidTransition {
        from: WorkflowStage,
        action: WorkflowAction,
    },

    #[error("Detection failed: {0}")]
    Detection(String),

    #[error("Recipe could not be parsed: {0}")]
    RecipeParse(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Object storage error: {0}")]
    ObjectStorageError(String),

    #[error("Write error: {0}")]
    WriteError(String),

    #[error("{failed} of {total} writes failed")]
    PartialWrite { failed: usize, total: usize },

    #[error("Session not found")]
    SessionNotFound,

    #[error("Not found")]
    NotFound,

    #[error("Internal server error")]
    InternalServerError,
}

impl CoreError {
    /// Errors caused by what the user supplied; the workflow stays where it is.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            CoreError::NoImageSelected | CoreError::EmptySelection | CoreError::UnknownItem(_)
        )
    }
}
