//! Error types for Hangout Core

use thiserror::Error;

use crate::permissions::{StageAction, StageBlock};
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{action} is not available: {block}")]
    StageBlocked {
        action: StageAction,
        block: StageBlock,
    },

    #[error("Limit reached: {0}")]
    LimitReached(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No changes found")]
    NoChanges,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the error left state untouched because of a local rule,
    /// as opposed to a storage or IO failure
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Error::Database(_) | Error::Io(_) | Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
