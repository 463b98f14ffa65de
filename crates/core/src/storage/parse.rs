//! Conversions from stored column values

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Error as SqlError;

use crate::models::HangoutSection;

fn conversion_error<E>(column: usize, e: E) -> SqlError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SqlError::FromSqlConversionFailure(column, Type::Text, Box::new(e))
}

/// Parse an RFC3339 timestamp column
pub fn parse_datetime(column: usize, s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

/// Parse a stored section name
pub fn parse_section(column: usize, s: &str) -> Result<HangoutSection, SqlError> {
    s.parse::<HangoutSection>()
        .map_err(|e| conversion_error(column, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Map `QueryReturnedNoRows` to `None`
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
