//! Evaluator error types

use thiserror::Error;

use crate::db::DbError;

/// Why an evaluation produced no result
#[derive(Debug, Error)]
pub enum EvaluateError {
    /// Caller sent unusable input; nothing was stored
    #[error("{0}")]
    Validation(String),

    /// The calculation store failed
    #[error("{0}")]
    Store(#[from] DbError),
}

impl EvaluateError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, EvaluateError::Validation(_))
    }
}
