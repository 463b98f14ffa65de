//! Hangout schedule and stage models

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::HangoutId;
use crate::error::{Error, Result};

/// Hangout stages in progression order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Stage {
    /// Members submit availability slots
    Availability = 1,
    /// Members propose suggestions
    Suggestions = 2,
    /// Members vote on suggestions
    Voting = 3,
    /// Terminal stage, votes are tallied
    Conclusion = 4,
}

impl Stage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Availability => "Availability",
            Stage::Suggestions => "Suggestions",
            Stage::Voting => "Voting",
            Stage::Conclusion => "Conclusion",
        }
    }

    /// The stage that follows this one, if any
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Availability => Some(Stage::Suggestions),
            Stage::Suggestions => Some(Stage::Voting),
            Stage::Voting => Some(Stage::Conclusion),
            Stage::Conclusion => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == Stage::Conclusion
    }

    /// All stages in progression order
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Availability,
            Stage::Suggestions,
            Stage::Voting,
            Stage::Conclusion,
        ]
    }
}

impl TryFrom<u8> for Stage {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Stage::Availability),
            2 => Ok(Stage::Suggestions),
            3 => Ok(Stage::Voting),
            4 => Ok(Stage::Conclusion),
            other => Err(format!("unknown hangout stage {}", other)),
        }
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> u8 {
        stage as u8
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Immutable schedule of a hangout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HangoutConfig {
    pub hangout_id: HangoutId,
    pub availability_period: Duration,
    pub suggestions_period: Duration,
    pub voting_period: Duration,
    pub created_at: DateTime<Utc>,
}

impl HangoutConfig {
    pub fn new(
        hangout_id: HangoutId,
        availability_period: Duration,
        suggestions_period: Duration,
        voting_period: Duration,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let periods = [
            ("availability", availability_period),
            ("suggestions", suggestions_period),
            ("voting", voting_period),
        ];

        for (name, period) in periods {
            if period <= Duration::zero() {
                return Err(Error::InvalidOperation(format!(
                    "{} period must be positive",
                    name
                )));
            }
        }

        let conclusion = created_at
            .checked_add_signed(availability_period)
            .and_then(|t| t.checked_add_signed(suggestions_period))
            .and_then(|t| t.checked_add_signed(voting_period));
        if conclusion.is_none() {
            return Err(Error::InvalidOperation(
                "hangout schedule ends outside the supported date range".into(),
            ));
        }

        Ok(Self {
            hangout_id,
            availability_period,
            suggestions_period,
            voting_period,
            created_at,
        })
    }

    /// Moment the hangout concludes
    pub fn conclusion_timestamp(&self) -> DateTime<Utc> {
        crate::temporal::conclusion_timestamp(self)
    }

    /// Scheduled end of a stage. Conclusion never ends.
    pub fn stage_ends_at(&self, stage: Stage) -> Option<DateTime<Utc>> {
        let availability_end = self.created_at + self.availability_period;
        match stage {
            Stage::Availability => Some(availability_end),
            Stage::Suggestions => Some(availability_end + self.suggestions_period),
            Stage::Voting => Some(self.conclusion_timestamp()),
            Stage::Conclusion => None,
        }
    }

    /// Stage the schedule predicts for `now`
    ///
    /// Display only. The server decides actual stage transitions.
    pub fn scheduled_stage_at(&self, now: DateTime<Utc>) -> Stage {
        Stage::all()
            .iter()
            .copied()
            .find(|stage| match self.stage_ends_at(*stage) {
                Some(end) => now < end,
                None => true,
            })
            .unwrap_or(Stage::Conclusion)
    }
}
