//! Suggestion model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MemberId, SuggestionId};

/// A proposed time and activity for the hangout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    /// None once the originating member has left the hangout
    pub member_id: Option<MemberId>,
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_edited: bool,
    pub likes_count: u32,
    pub votes_count: u32,
}

impl Suggestion {
    pub fn new(id: SuggestionId, member_id: MemberId, fields: SuggestionFields) -> Self {
        Self {
            id,
            member_id: Some(member_id),
            title: fields.title,
            description: fields.description,
            start: fields.start,
            end: fields.end,
            is_edited: false,
            likes_count: 0,
            votes_count: 0,
        }
    }

    /// The user-editable part of the suggestion
    pub fn fields(&self) -> SuggestionFields {
        SuggestionFields {
            title: self.title.clone(),
            description: self.description.clone(),
            start: self.start,
            end: self.end,
        }
    }

    pub fn is_orphaned(&self) -> bool {
        self.member_id.is_none()
    }

    pub fn is_created_by(&self, member_id: MemberId) -> bool {
        self.member_id == Some(member_id)
    }

    pub fn author_key(&self) -> AuthorKey {
        AuthorKey::from_member(self.member_id)
    }
}

/// Fields a member supplies when creating or editing a suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionFields {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Author bucket used by the suggestion filter
///
/// Suggestions from members who left are grouped under a synthetic
/// bucket that renders as "0".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorKey {
    Member(MemberId),
    Orphaned,
}

impl AuthorKey {
    pub fn from_member(member_id: Option<MemberId>) -> Self {
        match member_id {
            Some(id) => AuthorKey::Member(id),
            None => AuthorKey::Orphaned,
        }
    }

    /// Parse the filter key used by the presentation layer
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().parse::<i64>().ok()? {
            0 => Some(AuthorKey::Orphaned),
            id => Some(AuthorKey::Member(MemberId(id))),
        }
    }
}

impl fmt::Display for AuthorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorKey::Member(id) => write!(f, "{}", id),
            AuthorKey::Orphaned => f.write_str("0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_key_orphan_bucket() {
        assert_eq!(AuthorKey::parse("0"), Some(AuthorKey::Orphaned));
        assert_eq!(AuthorKey::parse("17"), Some(AuthorKey::Member(MemberId(17))));
        assert_eq!(AuthorKey::parse("abc"), None);
        assert_eq!(AuthorKey::Orphaned.to_string(), "0");
        assert_eq!(AuthorKey::from_member(None), AuthorKey::Orphaned);
    }
}
