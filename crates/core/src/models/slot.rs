//! Availability slot model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{MemberId, SlotId};

/// A window of time a member is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: SlotId,
    pub member_id: MemberId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AvailabilitySlot {
    pub fn new(id: SlotId, member_id: MemberId, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id,
            member_id,
            start,
            end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Touching endpoints do not count as overlap
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}
