//! Suggestion edit classification
//!
//! A change to the title or either timestamp alters what members agreed
//! to, so it wipes accumulated likes and votes. A description-only change
//! keeps them.

use crate::models::SuggestionFields;

/// Kind of change an edit makes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditClass {
    /// Nothing changed, the edit is a no-op
    Identical,
    /// Title or time window changed
    Major,
    /// Only the description changed
    Minor,
}

impl EditClass {
    pub fn is_major(&self) -> bool {
        matches!(self, EditClass::Major)
    }
}

/// Classify an edit by comparing the original and proposed fields
pub fn classify(original: &SuggestionFields, proposed: &SuggestionFields) -> EditClass {
    let title_changed = original.title != proposed.title;
    let start_changed = original.start != proposed.start;
    let end_changed = original.end != proposed.end;

    if title_changed || start_changed || end_changed {
        return EditClass::Major;
    }

    if original.description != proposed.description {
        return EditClass::Minor;
    }

    EditClass::Identical
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn fields() -> SuggestionFields {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
        SuggestionFields {
            title: "Dinner".to_string(),
            description: "Thai place downtown".to_string(),
            start,
            end: start + Duration::hours(2),
        }
    }

    #[test]
    fn test_identical() {
        assert_eq!(classify(&fields(), &fields()), EditClass::Identical);
    }

    #[test]
    fn test_description_only_is_minor() {
        let mut proposed = fields();
        proposed.description = "Thai place uptown".to_string();
        assert_eq!(classify(&fields(), &proposed), EditClass::Minor);
    }

    #[test]
    fn test_title_or_time_is_major() {
        let mut title = fields();
        title.title = "Lunch".to_string();
        assert_eq!(classify(&fields(), &title), EditClass::Major);

        let mut start = fields();
        start.start -= Duration::minutes(30);
        assert_eq!(classify(&fields(), &start), EditClass::Major);

        let mut end = fields();
        end.end += Duration::minutes(30);
        assert_eq!(classify(&fields(), &end), EditClass::Major);
    }

    #[test]
    fn test_major_dominates_description() {
        let mut proposed = fields();
        proposed.title = "Brunch".to_string();
        proposed.description = "Somewhere else".to_string();
        assert!(classify(&fields(), &proposed).is_major());
    }
}
