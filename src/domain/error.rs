use thiserror::Error;

use super::todo::TodoId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoError {
    /// Client-correctable input problem. The message is shown to the caller.
    #[error("{0}")]
    Validation(String),

    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    /// Unexpected failure. The detail is logged, never returned to clients.
    #[error("internal error: {0}")]
    Internal(String),
}
