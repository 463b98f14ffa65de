//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{AvailabilitySlot, HangoutConfig, Stage};
use crate::registry::SuggestionRegistry;

/// A hangout schedule must have positive periods
pub fn assert_config_invariants(config: &HangoutConfig) {
    debug_assert!(
        config.conclusion_timestamp() > config.created_at,
        "Hangout {} concludes at or before creation",
        config.hangout_id
    );
}

/// Registry ids are unique and the viewer's marks point at stored suggestions
pub fn assert_registry_invariants(registry: &SuggestionRegistry) {
    let mut seen = HashSet::new();
    for suggestion in registry.suggestions() {
        debug_assert!(
            seen.insert(suggestion.id),
            "Duplicate suggestion id {}",
            suggestion.id
        );
        debug_assert!(
            suggestion.end > suggestion.start,
            "Suggestion {} ends before it starts",
            suggestion.id
        );
    }

    debug_assert!(
        registry.voted_ids().iter().all(|id| seen.contains(id)),
        "Vote recorded for an unknown suggestion"
    );
    debug_assert!(
        registry.liked_ids().iter().all(|id| seen.contains(id)),
        "Like recorded for an unknown suggestion"
    );
    debug_assert!(
        registry.voted_ids().len() <= registry.limits().votes_per_member,
        "Viewer holds {} votes, limit is {}",
        registry.voted_ids().len(),
        registry.limits().votes_per_member
    );
}

pub fn assert_slot_invariants(slot: &AvailabilitySlot) {
    debug_assert!(
        slot.end > slot.start,
        "Availability slot {} ends before it starts",
        slot.id
    );
}

/// Stage moves forward unless the server corrected it
pub fn assert_stage_progression(from: Stage, to: Stage, corrected: bool) {
    debug_assert!(
        corrected || to >= from,
        "Stage moved backwards from {} to {} without a server correction",
        from,
        to
    );
}
