//! Network error types

use std::io;

use crate::failure::{ApiFailure, FailureKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Subscription rejected: {0}")]
    Rejected(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Request failed: {0}")]
    Api(ApiFailure),
}

impl Error {
    /// Failure classification, if the server answered at all
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Error::Api(failure) => Some(failure.kind()),
            _ => None,
        }
    }
}
