//! Hangout conclusion
//!
//! Picks the winning suggestion once voting ends. Ties are reported with
//! every tied suggestion in encounter order.

use crate::models::Suggestion;

/// Outcome of tallying a hangout's votes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConclusionResult {
    /// No suggestions were made
    Failed,
    /// Exactly one suggestion holds the most votes
    SingleWinner(Suggestion),
    /// Several suggestions share the most votes
    Tie(Vec<Suggestion>),
}

impl ConclusionResult {
    pub fn is_tie(&self) -> bool {
        matches!(self, ConclusionResult::Tie(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ConclusionResult::Failed)
    }

    /// Winning suggestions, empty on failure
    pub fn winners(&self) -> &[Suggestion] {
        match self {
            ConclusionResult::Failed => &[],
            ConclusionResult::SingleWinner(winner) => std::slice::from_ref(winner),
            ConclusionResult::Tie(winners) => winners,
        }
    }
}

/// Resolve the conclusion with a single left-to-right scan
pub fn resolve(suggestions: &[Suggestion]) -> ConclusionResult {
    let (first, rest) = match suggestions.split_first() {
        Some(split) => split,
        None => return ConclusionResult::Failed,
    };

    if rest.is_empty() {
        return ConclusionResult::SingleWinner(first.clone());
    }

    let mut max_votes = first.votes_count;
    let mut winners = vec![first];

    for suggestion in rest {
        if suggestion.votes_count > max_votes {
            max_votes = suggestion.votes_count;
            winners.clear();
            winners.push(suggestion);
        } else if suggestion.votes_count == max_votes {
            winners.push(suggestion);
        }
    }

    if winners.len() > 1 {
        ConclusionResult::Tie(winners.into_iter().cloned().collect())
    } else {
        ConclusionResult::SingleWinner(winners[0].clone())
    }
}
