//! User-facing notices
//!
//! Transient, dismissible messages raised when an action fails or the
//! hangout changes underneath the member.

use std::fmt;

use hangout_core::{Error as CoreError, ValidationField};
use hangout_net::{Error as NetError, FailureKind, FieldRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Form field to highlight
    pub field: Option<ValidationField>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            field: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            field: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            field: None,
        }
    }

    fn with_field(mut self, field: Option<ValidationField>) -> Self {
        self.field = field;
        self
    }

    /// Notice for an action refused locally
    pub fn from_core(error: &CoreError) -> Self {
        match error {
            CoreError::Validation(e) => Self::error(e.to_string()).with_field(Some(e.field())),
            CoreError::StageBlocked { .. } | CoreError::LimitReached(_) | CoreError::NoChanges => {
                Self::warning(error.to_string())
            }
            _ => Self::error(error.to_string()),
        }
    }

    /// Notice for a failed request
    pub fn from_net(error: &NetError) -> Self {
        let failure = match error {
            NetError::Api(failure) => failure,
            _ => return Self::error("Something went wrong. Please try again."),
        };

        match failure.kind() {
            FailureKind::Validation(field) => {
                Self::error(failure.message.clone()).with_field(field.map(validation_field))
            }
            FailureKind::StageConflict(_) => Self::warning(failure.message.clone()),
            FailureKind::LeadershipConflict(_) => Self::warning(failure.message.clone()),
            FailureKind::NotFound { hangout_gone: true } => {
                Self::error("This hangout no longer exists.")
            }
            FailureKind::NotFound { hangout_gone: false } => Self::info(failure.message.clone()),
            FailureKind::AuthExpired => Self::warning("Your session has expired. Please sign in again."),
            FailureKind::AuthInvalidated => Self::error("You have been signed out."),
            FailureKind::RateLimited => {
                Self::info("Too many requests. Please wait a moment and try again.")
            }
            FailureKind::Unknown => Self::error("Something went wrong. Please try again."),
        }
    }
}

fn validation_field(field: FieldRef) -> ValidationField {
    match field {
        FieldRef::Title => ValidationField::Title,
        FieldRef::Description => ValidationField::Description,
        FieldRef::DateTime => ValidationField::DateTime,
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
