//! Slot and suggestion validation
//!
//! Field-level checks run before anything reaches the registry or the
//! server. Every failure names the form field it belongs to.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use crate::config::Limits;
use crate::models::SuggestionFields;
use crate::temporal::ForwardWindow;

/// Form field a validation failure is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationField {
    Title,
    Description,
    DateTime,
}

impl fmt::Display for ValidationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationField::Title => "title",
            ValidationField::Description => "description",
            ValidationField::DateTime => "dateTime",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Slot ends before it starts")]
    EndsBeforeStart,

    #[error("Slot is too short, minimum is {min_minutes} minutes")]
    TooShort { min_minutes: i64 },

    #[error("Slot is too long, maximum is {max_minutes} minutes")]
    TooLong { max_minutes: i64 },

    #[error("Slot must start after the hangout concludes")]
    StartsBeforeConclusion,

    #[error("Date is outside the planning window")]
    OutsideForwardWindow,

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTimeFormat(String),

    #[error("Slot overlaps an existing slot")]
    Overlap,

    #[error("Title must be between {min} and {max} characters")]
    TitleLength { min: usize, max: usize },

    #[error("Description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
}

impl ValidationError {
    pub fn field(&self) -> ValidationField {
        match self {
            ValidationError::TitleLength { .. } => ValidationField::Title,
            ValidationError::DescriptionTooLong { .. } => ValidationField::Description,
            _ => ValidationField::DateTime,
        }
    }
}

pub type ValidationResult = std::result::Result<(), ValidationError>;

/// Check ordering and duration bounds of a time slot
pub fn validate_time_slot(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limits: &Limits,
) -> ValidationResult {
    if end < start {
        return Err(ValidationError::EndsBeforeStart);
    }

    let duration = end - start;
    if duration < limits.min_slot_duration() {
        return Err(ValidationError::TooShort {
            min_minutes: limits.min_slot_minutes,
        });
    }
    if duration > limits.max_slot_duration() {
        return Err(ValidationError::TooLong {
            max_minutes: limits.max_slot_minutes,
        });
    }

    Ok(())
}

/// A slot must begin strictly after the conclusion moment
pub fn validate_slot_start(start: DateTime<Utc>, conclusion: DateTime<Utc>) -> ValidationResult {
    if start <= conclusion {
        return Err(ValidationError::StartsBeforeConclusion);
    }
    Ok(())
}

/// The slot's start day must fall inside the planning window
pub fn validate_forward_window(
    start: DateTime<Utc>,
    conclusion: DateTime<Utc>,
    limits: &Limits,
) -> ValidationResult {
    let window = ForwardWindow::from_conclusion(conclusion, limits.forward_window_months);
    if !window.contains(start.date_naive()) {
        return Err(ValidationError::OutsideForwardWindow);
    }
    Ok(())
}

/// Full set of time checks applied to slots and suggestions
pub fn validate_schedule(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    conclusion: DateTime<Utc>,
    limits: &Limits,
) -> ValidationResult {
    validate_time_slot(start, end, limits)?;
    validate_slot_start(start, conclusion)?;
    validate_forward_window(start, conclusion, limits)
}

/// Parse a 24-hour `HH:MM` time of day
pub fn parse_time_of_day(s: &str) -> std::result::Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTimeFormat(s.to_string());

    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }

    let two_digits = |pair: &[u8]| -> Option<u32> {
        if pair.iter().all(u8::is_ascii_digit) {
            Some(u32::from(pair[0] - b'0') * 10 + u32::from(pair[1] - b'0'))
        } else {
            None
        }
    };

    let hours = two_digits(&bytes[0..2]).ok_or_else(invalid)?;
    let minutes = two_digits(&bytes[3..5]).ok_or_else(invalid)?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Combine a picked calendar day with an `HH:MM` time
pub fn combine_date_and_time(
    date: NaiveDate,
    time: &str,
) -> std::result::Result<DateTime<Utc>, ValidationError> {
    let time = parse_time_of_day(time)?;
    Ok(date.and_time(time).and_utc())
}

pub fn validate_title(title: &str, limits: &Limits) -> ValidationResult {
    let len = title.trim().chars().count();
    if len < limits.title_min_chars || len > limits.title_max_chars {
        return Err(ValidationError::TitleLength {
            min: limits.title_min_chars,
            max: limits.title_max_chars,
        });
    }
    Ok(())
}

pub fn validate_description(description: &str, limits: &Limits) -> ValidationResult {
    if description.trim().chars().count() > limits.description_max_chars {
        return Err(ValidationError::DescriptionTooLong {
            max: limits.description_max_chars,
        });
    }
    Ok(())
}

/// Validate everything a member typed into the suggestion form
pub fn validate_suggestion_fields(
    fields: &SuggestionFields,
    conclusion: DateTime<Utc>,
    limits: &Limits,
) -> ValidationResult {
    validate_title(&fields.title, limits)?;
    validate_description(&fields.description, limits)?;
    validate_schedule(fields.start, fields.end, conclusion, limits)
}
