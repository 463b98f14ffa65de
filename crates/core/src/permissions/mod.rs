//! Stage gating for hangout operations

use std::fmt;

use crate::models::Stage;

/// Actions a member can attempt in a hangout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageAction {
    // Availability
    AddAvailabilitySlot,
    EditAvailabilitySlot,
    DeleteAvailabilitySlot,

    // Suggestions
    CreateSuggestion,
    EditSuggestion,
    DeleteOwnSuggestion,
    LeaderDeleteSuggestion,
    LikeSuggestion,

    // Voting
    Vote,

    // Leader controls
    ProgressStage,
    ManageLeadership,
    KickMember,
}

impl StageAction {
    pub fn display_name(&self) -> &'static str {
        match self {
            StageAction::AddAvailabilitySlot => "Adding availability",
            StageAction::EditAvailabilitySlot => "Editing availability",
            StageAction::DeleteAvailabilitySlot => "Deleting availability",
            StageAction::CreateSuggestion => "Adding suggestions",
            StageAction::EditSuggestion => "Editing suggestions",
            StageAction::DeleteOwnSuggestion => "Deleting suggestions",
            StageAction::LeaderDeleteSuggestion => "Deleting members' suggestions",
            StageAction::LikeSuggestion => "Liking suggestions",
            StageAction::Vote => "Voting",
            StageAction::ProgressStage => "Progressing the hangout",
            StageAction::ManageLeadership => "Managing leadership",
            StageAction::KickMember => "Removing members",
        }
    }
}

impl fmt::Display for StageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Why a stage blocks an action. Mirrors the server's rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageBlock {
    InAvailabilityStage,
    InSuggestionsStage,
    InVotingStage,
    HangoutConcluded,
}

impl StageBlock {
    /// Block reason reported for the given current stage
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Availability => StageBlock::InAvailabilityStage,
            Stage::Suggestions => StageBlock::InSuggestionsStage,
            Stage::Voting => StageBlock::InVotingStage,
            Stage::Conclusion => StageBlock::HangoutConcluded,
        }
    }

    /// The stage this block implies the hangout is in
    pub fn stage(&self) -> Stage {
        match self {
            StageBlock::InAvailabilityStage => Stage::Availability,
            StageBlock::InSuggestionsStage => Stage::Suggestions,
            StageBlock::InVotingStage => Stage::Voting,
            StageBlock::HangoutConcluded => Stage::Conclusion,
        }
    }
}

impl fmt::Display for StageBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageBlock::InAvailabilityStage => "hangout is in the availability stage",
            StageBlock::InSuggestionsStage => "hangout is in the suggestions stage",
            StageBlock::InVotingStage => "hangout is in the voting stage",
            StageBlock::HangoutConcluded => "hangout has concluded",
        })
    }
}

/// Outcome of evaluating an action against a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Allowed,
    Blocked(StageBlock),
}

impl Gate {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Gate::Allowed)
    }
}

/// Stage policy matrix
pub struct StagePolicy;

impl StagePolicy {
    /// Check whether an action is legal in a stage
    pub fn evaluate(stage: Stage, action: StageAction) -> Gate {
        if Self::allowed_in(stage, action) {
            Gate::Allowed
        } else {
            Gate::Blocked(StageBlock::for_stage(stage))
        }
    }

    fn allowed_in(stage: Stage, action: StageAction) -> bool {
        match action {
            // Membership management survives the conclusion
            StageAction::ManageLeadership | StageAction::KickMember => true,

            // Everything else is frozen once concluded
            _ if stage == Stage::Conclusion => false,

            StageAction::AddAvailabilitySlot
            | StageAction::EditAvailabilitySlot
            | StageAction::DeleteAvailabilitySlot => stage == Stage::Availability,

            StageAction::CreateSuggestion
            | StageAction::EditSuggestion
            | StageAction::LeaderDeleteSuggestion => stage == Stage::Suggestions,

            StageAction::DeleteOwnSuggestion | StageAction::ProgressStage => true,

            StageAction::LikeSuggestion => {
                stage == Stage::Suggestions || stage == Stage::Voting
            }

            StageAction::Vote => stage == Stage::Voting,
        }
    }

    /// Actions only the hangout leader may take
    pub fn requires_leader(action: StageAction) -> bool {
        matches!(
            action,
            StageAction::ProgressStage
                | StageAction::LeaderDeleteSuggestion
                | StageAction::KickMember
        )
    }
}
