//! Suggestion registry
//!
//! In-memory store of a hangout's suggestions plus the viewing member's
//! likes and votes. Every mutating operation comes in two halves: a
//! `check_*` that validates without touching state, and an `apply_*` /
//! `insert_confirmed` / `forget` that records what the server confirmed.
//! The plain operation (`add`, `edit`, ...) runs both.

mod filter;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Limits;
use crate::edits::{classify, EditClass};
use crate::error::{Error, Result};
use crate::invariants::assert_registry_invariants;
use crate::models::{MemberId, Stage, Suggestion, SuggestionFields, SuggestionId};
use crate::permissions::StageAction;
use crate::stage::check_stage;
use crate::validation::validate_suggestion_fields;

pub use filter::{sort_suggestions, SortMode, SuggestionFilter};

/// Server view of a hangout's suggestions for one member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionsSnapshot {
    pub suggestions: Vec<Suggestion>,
    pub member_likes: Vec<SuggestionId>,
    pub member_votes: Vec<SuggestionId>,
}

/// Direction of a like or vote toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Who is deleting a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPath {
    /// The suggestion's creator
    Creator,
    /// The hangout leader removing someone else's suggestion
    Leader,
}

/// Suggestions of one hangout as seen by one member
#[derive(Debug, Clone)]
pub struct SuggestionRegistry {
    viewer: MemberId,
    conclusion: DateTime<Utc>,
    limits: Limits,
    /// Insertion order
    suggestions: Vec<Suggestion>,
    liked: HashSet<SuggestionId>,
    voted: HashSet<SuggestionId>,
    filter: SuggestionFilter,
    sort_mode: Option<SortMode>,
}

impl SuggestionRegistry {
    pub fn new(viewer: MemberId, conclusion: DateTime<Utc>, limits: Limits) -> Self {
        Self {
            viewer,
            conclusion,
            limits,
            suggestions: Vec::new(),
            liked: HashSet::new(),
            voted: HashSet::new(),
            filter: SuggestionFilter::default(),
            sort_mode: None,
        }
    }

    /// Replace contents with the server's snapshot
    ///
    /// Counts from the server are authoritative and overwrite any local
    /// prediction. Marks pointing at unknown suggestions are dropped.
    pub fn load(&mut self, snapshot: SuggestionsSnapshot) {
        let known: HashSet<SuggestionId> = snapshot.suggestions.iter().map(|s| s.id).collect();

        self.suggestions = snapshot.suggestions;
        self.liked = snapshot
            .member_likes
            .into_iter()
            .filter(|id| known.contains(id))
            .collect();
        self.voted = snapshot
            .member_votes
            .into_iter()
            .filter(|id| known.contains(id))
            .collect();

        tracing::debug!(
            suggestions = self.suggestions.len(),
            likes = self.liked.len(),
            votes = self.voted.len(),
            "Loaded suggestions snapshot"
        );
    }

    pub fn viewer(&self) -> MemberId {
        self.viewer
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn get(&self, id: SuggestionId) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: SuggestionId) -> Option<&mut Suggestion> {
        self.suggestions.iter_mut().find(|s| s.id == id)
    }

    fn require(&self, id: SuggestionId) -> Result<&Suggestion> {
        self.get(id)
            .ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))
    }

    /// All suggestions in insertion order
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    pub fn has_liked(&self, id: SuggestionId) -> bool {
        self.liked.contains(&id)
    }

    pub fn has_voted(&self, id: SuggestionId) -> bool {
        self.voted.contains(&id)
    }

    pub fn liked_ids(&self) -> &HashSet<SuggestionId> {
        &self.liked
    }

    pub fn voted_ids(&self) -> &HashSet<SuggestionId> {
        &self.voted
    }

    /// Suggestions currently attributed to a member
    pub fn member_suggestion_count(&self, member_id: MemberId) -> usize {
        self.suggestions
            .iter()
            .filter(|s| s.is_created_by(member_id))
            .count()
    }

    pub fn remaining_suggestion_slots(&self, member_id: MemberId) -> usize {
        self.limits
            .suggestions_per_member
            .saturating_sub(self.member_suggestion_count(member_id))
    }

    pub fn votes_left(&self) -> usize {
        self.limits.votes_per_member.saturating_sub(self.voted.len())
    }

    // Creation

    /// Check whether `member_id` may create a suggestion with `fields`
    pub fn check_add(
        &self,
        stage: Stage,
        member_id: MemberId,
        fields: &SuggestionFields,
    ) -> Result<()> {
        check_stage(stage, StageAction::CreateSuggestion)?;

        if self.member_suggestion_count(member_id) >= self.limits.suggestions_per_member {
            return Err(Error::LimitReached(format!(
                "at most {} suggestions per member",
                self.limits.suggestions_per_member
            )));
        }

        validate_suggestion_fields(fields, self.conclusion, &self.limits)?;
        Ok(())
    }

    /// Store a suggestion the server has accepted
    pub fn insert_confirmed(&mut self, suggestion: Suggestion) -> Result<SuggestionId> {
        if self.get(suggestion.id).is_some() {
            return Err(Error::InvalidOperation(format!(
                "suggestion {} already exists",
                suggestion.id
            )));
        }

        let id = suggestion.id;
        self.suggestions.push(suggestion);
        assert_registry_invariants(self);
        Ok(id)
    }

    /// Add a new suggestion, enforcing stage, limit and field rules
    pub fn add(&mut self, stage: Stage, suggestion: Suggestion) -> Result<SuggestionId> {
        let member_id = suggestion
            .member_id
            .ok_or_else(|| Error::InvalidOperation("suggestion has no author".into()))?;

        self.check_add(stage, member_id, &suggestion.fields())?;
        self.insert_confirmed(suggestion)
    }

    // Editing

    /// Classify a proposed edit, rejecting illegal or no-op edits
    pub fn check_edit(
        &self,
        stage: Stage,
        id: SuggestionId,
        editor: MemberId,
        proposed: &SuggestionFields,
    ) -> Result<EditClass> {
        check_stage(stage, StageAction::EditSuggestion)?;

        let suggestion = self.require(id)?;
        if !suggestion.is_created_by(editor) {
            return Err(Error::PermissionDenied(
                "only the creator can edit a suggestion".into(),
            ));
        }

        let class = classify(&suggestion.fields(), proposed);
        if class == EditClass::Identical {
            return Err(Error::NoChanges);
        }

        validate_suggestion_fields(proposed, self.conclusion, &self.limits)?;
        Ok(class)
    }

    /// Record an accepted edit. `major` is the server's verdict.
    pub fn apply_edit(&mut self, id: SuggestionId, fields: SuggestionFields, major: bool) -> Result<()> {
        let suggestion = self
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))?;

        suggestion.title = fields.title;
        suggestion.description = fields.description;
        suggestion.start = fields.start;
        suggestion.end = fields.end;
        suggestion.is_edited = true;

        if major {
            suggestion.likes_count = 0;
            suggestion.votes_count = 0;
            self.liked.remove(&id);
            self.voted.remove(&id);
        }

        Ok(())
    }

    /// Edit a suggestion. Major edits discard likes and votes.
    pub fn edit(
        &mut self,
        stage: Stage,
        id: SuggestionId,
        editor: MemberId,
        fields: SuggestionFields,
    ) -> Result<EditClass> {
        let class = self.check_edit(stage, id, editor, &fields)?;
        self.apply_edit(id, fields, class.is_major())?;
        Ok(class)
    }

    // Removal

    /// Decide which removal path applies, if any
    pub fn check_remove(
        &self,
        stage: Stage,
        id: SuggestionId,
        requested_by: MemberId,
        is_leader: bool,
    ) -> Result<RemovalPath> {
        let suggestion = self.require(id)?;

        if suggestion.is_created_by(requested_by) {
            check_stage(stage, StageAction::DeleteOwnSuggestion)?;
            return Ok(RemovalPath::Creator);
        }

        if is_leader {
            check_stage(stage, StageAction::LeaderDeleteSuggestion)?;
            return Ok(RemovalPath::Leader);
        }

        Err(Error::PermissionDenied(
            "only the creator or the leader can delete a suggestion".into(),
        ))
    }

    /// Drop a suggestion and the viewer's marks on it
    pub fn forget(&mut self, id: SuggestionId) -> Option<Suggestion> {
        let index = self.suggestions.iter().position(|s| s.id == id)?;
        self.liked.remove(&id);
        self.voted.remove(&id);
        Some(self.suggestions.remove(index))
    }

    pub fn remove(
        &mut self,
        stage: Stage,
        id: SuggestionId,
        requested_by: MemberId,
        is_leader: bool,
    ) -> Result<Suggestion> {
        self.check_remove(stage, id, requested_by, is_leader)?;
        self.forget(id)
            .ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))
    }

    /// Null the authorship of a departed member's suggestions
    pub fn orphan_member(&mut self, member_id: MemberId) -> usize {
        let mut orphaned = 0;
        for suggestion in self
            .suggestions
            .iter_mut()
            .filter(|s| s.is_created_by(member_id))
        {
            suggestion.member_id = None;
            orphaned += 1;
        }
        orphaned
    }

    // Likes and votes

    pub fn check_like(&self, stage: Stage, id: SuggestionId) -> Result<Toggle> {
        check_stage(stage, StageAction::LikeSuggestion)?;
        self.require(id)?;

        Ok(if self.liked.contains(&id) {
            Toggle::Removed
        } else {
            Toggle::Added
        })
    }

    /// Record a like change and predict the new count
    pub fn apply_like(&mut self, id: SuggestionId, toggle: Toggle) -> Result<()> {
        let suggestion = self
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))?;

        match toggle {
            Toggle::Added => {
                suggestion.likes_count += 1;
                self.liked.insert(id);
            }
            Toggle::Removed => {
                suggestion.likes_count = suggestion.likes_count.saturating_sub(1);
                self.liked.remove(&id);
            }
        }
        Ok(())
    }

    pub fn toggle_like(&mut self, stage: Stage, id: SuggestionId) -> Result<Toggle> {
        let toggle = self.check_like(stage, id)?;
        self.apply_like(id, toggle)?;
        Ok(toggle)
    }

    pub fn check_vote(&self, stage: Stage, id: SuggestionId) -> Result<Toggle> {
        check_stage(stage, StageAction::Vote)?;
        self.require(id)?;

        if self.voted.contains(&id) {
            return Ok(Toggle::Removed);
        }

        if self.voted.len() >= self.limits.votes_per_member {
            return Err(Error::LimitReached(format!(
                "at most {} votes per member",
                self.limits.votes_per_member
            )));
        }

        Ok(Toggle::Added)
    }

    /// Record a vote change and predict the new count
    pub fn apply_vote(&mut self, id: SuggestionId, toggle: Toggle) -> Result<()> {
        let suggestion = self
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("suggestion {}", id)))?;

        match toggle {
            Toggle::Added => {
                suggestion.votes_count += 1;
                self.voted.insert(id);
            }
            Toggle::Removed => {
                suggestion.votes_count = suggestion.votes_count.saturating_sub(1);
                self.voted.remove(&id);
            }
        }
        Ok(())
    }

    pub fn toggle_vote(&mut self, stage: Stage, id: SuggestionId) -> Result<Toggle> {
        let toggle = self.check_vote(stage, id)?;
        self.apply_vote(id, toggle)?;
        Ok(toggle)
    }

    // Views

    /// Suggestions matching a filter, in insertion order
    pub fn filter(&self, filter: &SuggestionFilter) -> Vec<&Suggestion> {
        self.suggestions
            .iter()
            .filter(|s| filter.matches(s, &self.liked, &self.voted))
            .collect()
    }

    pub fn set_filter(&mut self, filter: SuggestionFilter) {
        self.filter = filter;
    }

    pub fn active_filter(&self) -> &SuggestionFilter {
        &self.filter
    }

    /// Choose the ordering used by `visible`
    pub fn sort(&mut self, mode: SortMode) {
        self.sort_mode = Some(mode);
    }

    pub fn sort_mode(&self) -> Option<SortMode> {
        self.sort_mode
    }

    /// Suggestions after the active filter and sort
    pub fn visible(&self) -> Vec<&Suggestion> {
        let mut shown = self.filter(&self.filter);
        if let Some(mode) = self.sort_mode {
            sort_suggestions(&mut shown, mode);
        }
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorKey;
    use crate::permissions::StageBlock;
    use crate::validation::ValidationError;
    use chrono::{Duration, TimeZone};

    const ME: MemberId = MemberId(1);
    const OTHER: MemberId = MemberId(2);

    fn conclusion() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap()
    }

    fn fields(title: &str) -> SuggestionFields {
        let start = conclusion() + Duration::days(3);
        SuggestionFields {
            title: title.to_string(),
            description: "Details".to_string(),
            start,
            end: start + Duration::hours(2),
        }
    }

    fn suggestion(id: i64, member: MemberId, title: &str) -> Suggestion {
        Suggestion::new(SuggestionId(id), member, fields(title))
    }

    fn registry() -> SuggestionRegistry {
        SuggestionRegistry::new(ME, conclusion(), Limits::default())
    }

    fn seeded() -> SuggestionRegistry {
        let mut registry = registry();
        registry.add(Stage::Suggestions, suggestion(1, ME, "Bowling")).unwrap();
        registry.add(Stage::Suggestions, suggestion(2, OTHER, "Board games")).unwrap();
        registry.add(Stage::Suggestions, suggestion(3, OTHER, "Hiking trip")).unwrap();
        registry
    }

    #[test]
    fn test_add_gated_by_stage() {
        let mut registry = registry();

        for stage in [Stage::Availability, Stage::Voting, Stage::Conclusion] {
            let result = registry.add(stage, suggestion(1, ME, "Bowling"));
            assert!(matches!(result, Err(Error::StageBlocked { .. })));
            assert!(registry.is_empty());
        }

        assert_eq!(
            registry.add(Stage::Suggestions, suggestion(1, ME, "Bowling")).unwrap(),
            SuggestionId(1)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concluded_reason() {
        let mut registry = registry();
        match registry.add(Stage::Conclusion, suggestion(1, ME, "Bowling")) {
            Err(Error::StageBlocked { block, .. }) => assert_eq!(block, StageBlock::HangoutConcluded),
            other => panic!("Expected stage block, got {:?}", other),
        }
    }

    #[test]
    fn test_suggestion_limit_per_member() {
        let mut registry = registry();
        for id in 1..=3 {
            registry
                .add(Stage::Suggestions, suggestion(id, ME, "Bowling"))
                .unwrap();
        }
        assert_eq!(registry.remaining_suggestion_slots(ME), 0);

        let result = registry.add(Stage::Suggestions, suggestion(4, ME, "Bowling"));
        assert!(matches!(result, Err(Error::LimitReached(_))));
        assert_eq!(registry.len(), 3);

        // Removing frees a slot
        registry.remove(Stage::Suggestions, SuggestionId(2), ME, false).unwrap();
        assert_eq!(registry.remaining_suggestion_slots(ME), 1);
        assert!(registry.add(Stage::Suggestions, suggestion(4, ME, "Bowling")).is_ok());
    }

    #[test]
    fn test_add_rejects_invalid_fields_and_duplicates() {
        let mut registry = registry();
        let mut early = suggestion(1, ME, "Bowling");
        early.start = conclusion() - Duration::hours(3);
        early.end = conclusion() - Duration::hours(1);

        assert!(matches!(
            registry.add(Stage::Suggestions, early),
            Err(Error::Validation(ValidationError::StartsBeforeConclusion))
        ));

        registry.add(Stage::Suggestions, suggestion(1, ME, "Bowling")).unwrap();
        assert!(matches!(
            registry.add(Stage::Suggestions, suggestion(1, OTHER, "Karaoke")),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_minor_edit_keeps_counts() {
        let mut registry = seeded();
        registry.apply_like(SuggestionId(1), Toggle::Added).unwrap();

        let mut proposed = fields("Bowling");
        proposed.description = "Lane 7".to_string();
        let class = registry
            .edit(Stage::Suggestions, SuggestionId(1), ME, proposed)
            .unwrap();

        assert_eq!(class, EditClass::Minor);
        let edited = registry.get(SuggestionId(1)).unwrap();
        assert!(edited.is_edited);
        assert_eq!(edited.likes_count, 1);
        assert!(registry.has_liked(SuggestionId(1)));
    }

    #[test]
    fn test_major_edit_resets_counts() {
        let mut registry = seeded();
        registry.apply_like(SuggestionId(1), Toggle::Added).unwrap();

        let class = registry
            .edit(Stage::Suggestions, SuggestionId(1), ME, fields("Bowling night"))
            .unwrap();

        assert_eq!(class, EditClass::Major);
        let edited = registry.get(SuggestionId(1)).unwrap();
        assert_eq!(edited.likes_count, 0);
        assert_eq!(edited.votes_count, 0);
        assert!(!registry.has_liked(SuggestionId(1)));
    }

    #[test]
    fn test_edit_rejections() {
        let mut registry = seeded();

        assert!(matches!(
            registry.edit(Stage::Suggestions, SuggestionId(1), ME, fields("Bowling")),
            Err(Error::NoChanges)
        ));
        assert!(matches!(
            registry.edit(Stage::Suggestions, SuggestionId(2), ME, fields("Chess")),
            Err(Error::PermissionDenied(_))
        ));
        assert!(matches!(
            registry.edit(Stage::Voting, SuggestionId(1), ME, fields("Chess")),
            Err(Error::StageBlocked { .. })
        ));
        assert!(matches!(
            registry.edit(Stage::Availability, SuggestionId(1), ME, fields("Chess")),
            Err(Error::StageBlocked { .. })
        ));
        assert!(matches!(
            registry.edit(Stage::Suggestions, SuggestionId(99), ME, fields("Chess")),
            Err(Error::NotFound(_))
        ));
        assert_eq!(registry.get(SuggestionId(1)).unwrap().title, "Bowling");
    }

    #[test]
    fn test_leader_removal_only_during_suggestions() {
        let mut registry = seeded();

        assert!(matches!(
            registry.remove(Stage::Voting, SuggestionId(2), ME, true),
            Err(Error::StageBlocked { .. })
        ));
        assert_eq!(
            registry.check_remove(Stage::Suggestions, SuggestionId(2), ME, true).unwrap(),
            RemovalPath::Leader
        );
        assert!(matches!(
            registry.remove(Stage::Suggestions, SuggestionId(2), ME, false),
            Err(Error::PermissionDenied(_))
        ));

        // Creators may still delete during voting
        registry.remove(Stage::Voting, SuggestionId(1), ME, false).unwrap();
        assert!(registry.get(SuggestionId(1)).is_none());
        assert!(matches!(
            registry.remove(Stage::Conclusion, SuggestionId(2), OTHER, false),
            Err(Error::StageBlocked { .. })
        ));
    }

    #[test]
    fn test_vote_cap() {
        let mut registry = seeded();
        registry.add(Stage::Suggestions, suggestion(4, ME, "Cinema")).unwrap();

        for id in 1..=3 {
            assert_eq!(
                registry.toggle_vote(Stage::Voting, SuggestionId(id)).unwrap(),
                Toggle::Added
            );
        }
        assert_eq!(registry.votes_left(), 0);

        let result = registry.toggle_vote(Stage::Voting, SuggestionId(4));
        assert!(matches!(result, Err(Error::LimitReached(_))));
        assert_eq!(registry.get(SuggestionId(4)).unwrap().votes_count, 0);
        assert!(!registry.has_voted(SuggestionId(4)));

        // Removing an existing vote is still allowed at the cap
        assert_eq!(
            registry.toggle_vote(Stage::Voting, SuggestionId(2)).unwrap(),
            Toggle::Removed
        );
        assert_eq!(
            registry.toggle_vote(Stage::Voting, SuggestionId(4)).unwrap(),
            Toggle::Added
        );
    }

    #[test]
    fn test_vote_only_during_voting() {
        let mut registry = seeded();
        assert!(matches!(
            registry.toggle_vote(Stage::Suggestions, SuggestionId(1)),
            Err(Error::StageBlocked { .. })
        ));
    }

    #[test]
    fn test_like_toggle_and_clamp() {
        let mut registry = seeded();

        assert_eq!(
            registry.toggle_like(Stage::Suggestions, SuggestionId(2)).unwrap(),
            Toggle::Added
        );
        assert_eq!(registry.get(SuggestionId(2)).unwrap().likes_count, 1);
        assert_eq!(
            registry.toggle_like(Stage::Voting, SuggestionId(2)).unwrap(),
            Toggle::Removed
        );
        assert_eq!(registry.get(SuggestionId(2)).unwrap().likes_count, 0);

        // Local prediction never goes negative
        registry.apply_like(SuggestionId(2), Toggle::Removed).unwrap();
        assert_eq!(registry.get(SuggestionId(2)).unwrap().likes_count, 0);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let mut registry = seeded();
        registry.apply_like(SuggestionId(2), Toggle::Added).unwrap();
        registry.apply_like(SuggestionId(3), Toggle::Added).unwrap();
        registry.orphan_member(OTHER);

        let ids = |list: Vec<&Suggestion>| list.iter().map(|s| s.id.0).collect::<Vec<_>>();

        assert_eq!(ids(registry.filter(&SuggestionFilter::new().with_title("  bO"))), vec![1, 2]);
        assert_eq!(
            ids(registry.filter(&SuggestionFilter::new().with_authors([AuthorKey::Orphaned]))),
            vec![2, 3]
        );
        assert_eq!(
            ids(registry.filter(
                &SuggestionFilter::new()
                    .with_title("b")
                    .with_authors([AuthorKey::Orphaned])
                    .liked_by_me()
            )),
            vec![2]
        );
        assert!(registry
            .filter(&SuggestionFilter::new().voted_by_me())
            .is_empty());
        assert_eq!(registry.filter(&SuggestionFilter::new()).len(), 3);
        assert!(!SuggestionFilter::new().with_title("   ").is_active());
    }

    #[test]
    fn test_sort_is_stable_descending() {
        let mut registry = seeded();
        registry.add(Stage::Suggestions, suggestion(4, ME, "Cinema")).unwrap();
        for (id, likes) in [(1, 1), (2, 3), (3, 1), (4, 3)] {
            for _ in 0..likes {
                registry.apply_like(SuggestionId(id), Toggle::Added).unwrap();
            }
        }

        registry.sort(SortMode::Likes);
        let order: Vec<i64> = registry.visible().iter().map(|s| s.id.0).collect();
        assert_eq!(order, vec![2, 4, 1, 3]);

        // Storage keeps insertion order
        let stored: Vec<i64> = registry.suggestions().iter().map(|s| s.id.0).collect();
        assert_eq!(stored, vec![1, 2, 3, 4]);

        registry.sort(SortMode::Votes);
        let order: Vec<i64> = registry.visible().iter().map(|s| s.id.0).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_load_replaces_with_server_counts() {
        let mut registry = seeded();
        registry.apply_like(SuggestionId(1), Toggle::Added).unwrap();

        let mut server = suggestion(1, ME, "Bowling");
        server.likes_count = 4;
        registry.load(SuggestionsSnapshot {
            suggestions: vec![server],
            member_likes: vec![SuggestionId(1), SuggestionId(9)],
            member_votes: vec![],
        });

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(SuggestionId(1)).unwrap().likes_count, 4);
        assert_eq!(registry.liked_ids().len(), 1);
    }

    #[test]
    fn test_orphaned_suggestions_keep_counting_for_nobody() {
        let mut registry = seeded();
        assert_eq!(registry.orphan_member(OTHER), 2);
        assert_eq!(registry.member_suggestion_count(OTHER), 0);
        assert!(registry.get(SuggestionId(2)).unwrap().is_orphaned());
    }
}
