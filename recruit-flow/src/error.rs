use thiserror::Error;

use crate::step::StepId;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Transition table has no entry for steps: {0:?}")]
    IncompleteTable(Vec<StepId>),
}

pub type Result<T> = std::result::Result<T, FlowError>;
