//! Suggestion filtering and sorting

use std::collections::HashSet;

use crate::models::{AuthorKey, Suggestion, SuggestionId};

/// Conjunctive suggestion filter. Every active criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionFilter {
    /// Case-insensitive title substring
    pub title_query: Option<String>,
    /// Allowed authors; None allows everyone
    pub authors: Option<HashSet<AuthorKey>>,
    pub liked_by_me: bool,
    pub voted_by_me: bool,
}

impl SuggestionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, query: impl Into<String>) -> Self {
        self.title_query = Some(query.into());
        self
    }

    pub fn with_authors(mut self, authors: impl IntoIterator<Item = AuthorKey>) -> Self {
        self.authors = Some(authors.into_iter().collect());
        self
    }

    pub fn liked_by_me(mut self) -> Self {
        self.liked_by_me = true;
        self
    }

    pub fn voted_by_me(mut self) -> Self {
        self.voted_by_me = true;
        self
    }

    /// True when at least one criterion narrows the list
    pub fn is_active(&self) -> bool {
        self.normalized_query().is_some()
            || self.authors.is_some()
            || self.liked_by_me
            || self.voted_by_me
    }

    fn normalized_query(&self) -> Option<String> {
        self.title_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub(crate) fn matches(
        &self,
        suggestion: &Suggestion,
        liked: &HashSet<SuggestionId>,
        voted: &HashSet<SuggestionId>,
    ) -> bool {
        if let Some(query) = self.normalized_query() {
            if !suggestion.title.to_lowercase().contains(&query) {
                return false;
            }
        }

        if let Some(authors) = &self.authors {
            if !authors.contains(&suggestion.author_key()) {
                return false;
            }
        }

        if self.liked_by_me && !liked.contains(&suggestion.id) {
            return false;
        }

        if self.voted_by_me && !voted.contains(&suggestion.id) {
            return false;
        }

        true
    }
}

/// Count used to order suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Likes,
    Votes,
}

impl SortMode {
    fn key(&self, suggestion: &Suggestion) -> u32 {
        match self {
            SortMode::Likes => suggestion.likes_count,
            SortMode::Votes => suggestion.votes_count,
        }
    }
}

/// Sort descending by the chosen count
///
/// `sort_by` is stable, so ties keep the order they arrived in. No
/// secondary key is applied.
pub fn sort_suggestions(suggestions: &mut [&Suggestion], mode: SortMode) {
    suggestions.sort_by(|a, b| mode.key(b).cmp(&mode.key(a)));
}
