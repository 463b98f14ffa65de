//! Stage progression state
//!
//! The server decides when a hangout moves between stages. The controller
//! only remembers the last known stage, gates local actions against it
//! and reconciles when the server disagrees.

use crate::error::{Error, Result};
use crate::invariants::assert_stage_progression;
use crate::models::Stage;
use crate::permissions::{Gate, StageAction, StagePolicy};

/// Effect of feeding a stage into the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTransition {
    /// Moved forward
    Advanced { from: Stage, to: Stage },
    /// Server correction moved the stage (possibly backwards)
    Corrected { from: Stage, to: Stage },
    /// Already at this stage
    Unchanged,
    /// A stale signal tried to move backwards and was dropped
    IgnoredRegression { current: Stage, requested: Stage },
}

impl StageTransition {
    /// Did the local stage change?
    pub fn changed(&self) -> bool {
        matches!(
            self,
            StageTransition::Advanced { .. } | StageTransition::Corrected { .. }
        )
    }

    /// Did this transition land on the conclusion stage?
    pub fn reached_conclusion(&self) -> bool {
        matches!(
            self,
            StageTransition::Advanced { to: Stage::Conclusion, .. }
                | StageTransition::Corrected { to: Stage::Conclusion, .. }
        )
    }
}

/// Last known stage of a hangout
#[derive(Debug, Clone)]
pub struct StageController {
    current: Stage,
    /// Number of server corrections applied
    corrections: u32,
}

impl StageController {
    pub fn new(current: Stage) -> Self {
        Self {
            current,
            corrections: 0,
        }
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    pub fn is_concluded(&self) -> bool {
        self.current.is_terminal()
    }

    pub fn corrections(&self) -> u32 {
        self.corrections
    }

    /// Apply a stage announced by the signal feed. Forward only.
    pub fn advance_to(&mut self, stage: Stage) -> StageTransition {
        if stage == self.current {
            return StageTransition::Unchanged;
        }

        if stage < self.current {
            tracing::warn!(
                current = %self.current,
                requested = %stage,
                "Ignoring stage regression from signal"
            );
            return StageTransition::IgnoredRegression {
                current: self.current,
                requested: stage,
            };
        }

        let from = self.current;
        assert_stage_progression(from, stage, false);
        self.current = stage;
        tracing::info!(from = %from, to = %stage, "Hangout stage advanced");
        StageTransition::Advanced { from, to: stage }
    }

    /// Adopt the server's stage after it rejected an action as out of stage
    pub fn correct_to(&mut self, stage: Stage) -> StageTransition {
        if stage == self.current {
            return StageTransition::Unchanged;
        }

        let from = self.current;
        assert_stage_progression(from, stage, true);
        self.current = stage;
        self.corrections += 1;
        tracing::info!(from = %from, to = %stage, "Hangout stage corrected by server");
        StageTransition::Corrected { from, to: stage }
    }

    /// Evaluate an action against the current stage
    pub fn gate(&self, action: StageAction) -> Gate {
        StagePolicy::evaluate(self.current, action)
    }

    /// Error unless the action is legal in the current stage
    pub fn check(&self, action: StageAction) -> Result<()> {
        check_stage(self.current, action)
    }
}

/// Error unless `action` is legal in `stage`
pub fn check_stage(stage: Stage, action: StageAction) -> Result<()> {
    match StagePolicy::evaluate(stage, action) {
        Gate::Allowed => Ok(()),
        Gate::Blocked(block) => Err(Error::StageBlocked { action, block }),
    }
}
