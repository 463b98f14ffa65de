//! Availability book
//!
//! Every member's availability slots for one hangout. Slots can only be
//! changed during the availability stage and a member's slots may not
//! overlap each other.

use chrono::{DateTime, Utc};

use crate::config::Limits;
use crate::error::{Error, Result};
use crate::invariants::assert_slot_invariants;
use crate::models::{AvailabilitySlot, MemberId, SlotId, Stage};
use crate::permissions::StageAction;
use crate::stage::check_stage;
use crate::validation::{validate_schedule, ValidationError};

#[derive(Debug, Clone)]
pub struct AvailabilityBook {
    conclusion: DateTime<Utc>,
    limits: Limits,
    slots: Vec<AvailabilitySlot>,
}

impl AvailabilityBook {
    pub fn new(conclusion: DateTime<Utc>, limits: Limits) -> Self {
        Self {
            conclusion,
            limits,
            slots: Vec::new(),
        }
    }

    /// Replace contents with the server's slots
    pub fn load(&mut self, slots: Vec<AvailabilitySlot>) {
        self.slots = slots;
        tracing::debug!(slots = self.slots.len(), "Loaded availability slots");
    }

    pub fn get(&self, id: SlotId) -> Option<&AvailabilitySlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn slots(&self) -> &[AvailabilitySlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn member_slots(&self, member_id: MemberId) -> Vec<&AvailabilitySlot> {
        self.slots
            .iter()
            .filter(|s| s.member_id == member_id)
            .collect()
    }

    fn check_window(
        &self,
        member_id: MemberId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        ignore: Option<SlotId>,
    ) -> Result<()> {
        validate_schedule(start, end, self.conclusion, &self.limits)?;

        let overlapping = self
            .slots
            .iter()
            .filter(|s| s.member_id == member_id && Some(s.id) != ignore)
            .any(|s| s.overlaps(start, end));

        if overlapping {
            return Err(ValidationError::Overlap.into());
        }
        Ok(())
    }

    pub fn check_add(
        &self,
        stage: Stage,
        member_id: MemberId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()> {
        check_stage(stage, StageAction::AddAvailabilitySlot)?;

        if self.member_slots(member_id).len() >= self.limits.availability_slots_per_member {
            return Err(Error::LimitReached(format!(
                "at most {} availability slots per member",
                self.limits.availability_slots_per_member
            )));
        }

        self.check_window(member_id, start, end, None)
    }

    /// Store a slot the server has accepted
    pub fn insert_confirmed(&mut self, slot: AvailabilitySlot) -> Result<SlotId> {
        if self.get(slot.id).is_some() {
            return Err(Error::InvalidOperation(format!(
                "availability slot {} already exists",
                slot.id
            )));
        }

        assert_slot_invariants(&slot);
        let id = slot.id;
        self.slots.push(slot);
        Ok(id)
    }

    pub fn add(&mut self, stage: Stage, slot: AvailabilitySlot) -> Result<SlotId> {
        self.check_add(stage, slot.member_id, slot.start, slot.end)?;
        self.insert_confirmed(slot)
    }

    /// Check an edit. The slot's own current range does not count as overlap.
    pub fn check_edit(
        &self,
        stage: Stage,
        id: SlotId,
        editor: MemberId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()> {
        check_stage(stage, StageAction::EditAvailabilitySlot)?;

        let slot = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("availability slot {}", id)))?;
        if slot.member_id != editor {
            return Err(Error::PermissionDenied(
                "availability slots can only be edited by their owner".into(),
            ));
        }
        if slot.start == start && slot.end == end {
            return Err(Error::NoChanges);
        }

        self.check_window(editor, start, end, Some(id))
    }

    pub fn apply_edit(&mut self, id: SlotId, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("availability slot {}", id)))?;

        slot.start = start;
        slot.end = end;
        assert_slot_invariants(slot);
        Ok(())
    }

    pub fn edit(
        &mut self,
        stage: Stage,
        id: SlotId,
        editor: MemberId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()> {
        self.check_edit(stage, id, editor, start, end)?;
        self.apply_edit(id, start, end)
    }

    pub fn check_remove(&self, stage: Stage, id: SlotId, requested_by: MemberId) -> Result<()> {
        check_stage(stage, StageAction::DeleteAvailabilitySlot)?;

        let slot = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("availability slot {}", id)))?;
        if slot.member_id != requested_by {
            return Err(Error::PermissionDenied(
                "availability slots can only be deleted by their owner".into(),
            ));
        }
        Ok(())
    }

    /// Drop a slot unconditionally
    pub fn forget(&mut self, id: SlotId) -> Option<AvailabilitySlot> {
        let index = self.slots.iter().position(|s| s.id == id)?;
        Some(self.slots.remove(index))
    }

    pub fn remove(&mut self, stage: Stage, id: SlotId, requested_by: MemberId) -> Result<AvailabilitySlot> {
        self.check_remove(stage, id, requested_by)?;
        self.forget(id)
            .ok_or_else(|| Error::NotFound(format!("availability slot {}", id)))
    }

    /// Drop every slot of a member who left. Returns how many went.
    pub fn remove_member(&mut self, member_id: MemberId) -> usize {
        let before = self.slots.len();
        self.slots.retain(|s| s.member_id != member_id);
        before - self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const ME: MemberId = MemberId(1);
    const OTHER: MemberId = MemberId(2);

    fn conclusion() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap()
    }

    fn day(offset: i64, hour: i64) -> DateTime<Utc> {
        conclusion() + Duration::days(offset) + Duration::hours(hour)
    }

    fn slot(id: i64, member: MemberId, start: DateTime<Utc>, hours: i64) -> AvailabilitySlot {
        AvailabilitySlot::new(SlotId(id), member, start, start + Duration::hours(hours))
    }

    fn book() -> AvailabilityBook {
        AvailabilityBook::new(conclusion(), Limits::default())
    }

    #[test]
    fn test_add_only_during_availability() {
        let mut book = book();
        assert!(matches!(
            book.add(Stage::Suggestions, slot(1, ME, day(1, 0), 2)),
            Err(Error::StageBlocked { .. })
        ));
        assert!(book.add(Stage::Availability, slot(1, ME, day(1, 0), 2)).is_ok());
    }

    #[test]
    fn test_overlap_per_member() {
        let mut book = book();
        book.add(Stage::Availability, slot(1, ME, day(1, 0), 2)).unwrap();

        assert!(matches!(
            book.add(Stage::Availability, slot(2, ME, day(1, 1), 2)),
            Err(Error::Validation(ValidationError::Overlap))
        ));
        // Touching endpoints are fine
        assert!(book.add(Stage::Availability, slot(2, ME, day(1, 2), 2)).is_ok());
        // Other members may overlap
        assert!(book.add(Stage::Availability, slot(3, OTHER, day(1, 1), 2)).is_ok());
    }

    #[test]
    fn test_slot_limit() {
        let mut book = book();
        for id in 0..10 {
            book.add(Stage::Availability, slot(id, ME, day(id + 1, 0), 2)).unwrap();
        }
        assert!(matches!(
            book.add(Stage::Availability, slot(10, ME, day(20, 0), 2)),
            Err(Error::LimitReached(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_schedule() {
        let mut book = book();
        assert!(matches!(
            book.add(Stage::Availability, slot(1, ME, day(0, -3), 2)),
            Err(Error::Validation(ValidationError::StartsBeforeConclusion))
        ));
        assert!(matches!(
            book.add(Stage::Availability, slot(1, ME, day(1, 0), 25)),
            Err(Error::Validation(ValidationError::TooLong { .. }))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn test_edit_ignores_own_range() {
        let mut book = book();
        book.add(Stage::Availability, slot(1, ME, day(1, 0), 2)).unwrap();

        book.edit(Stage::Availability, SlotId(1), ME, day(1, 1), day(1, 4))
            .unwrap();
        assert_eq!(book.get(SlotId(1)).unwrap().start, day(1, 1));

        assert!(matches!(
            book.edit(Stage::Availability, SlotId(1), OTHER, day(1, 2), day(1, 4)),
            Err(Error::PermissionDenied(_))
        ));
        assert!(matches!(
            book.edit(Stage::Availability, SlotId(1), ME, day(1, 1), day(1, 4)),
            Err(Error::NoChanges)
        ));
    }

    #[test]
    fn test_remove_and_member_departure() {
        let mut book = book();
        book.add(Stage::Availability, slot(1, ME, day(1, 0), 2)).unwrap();
        book.add(Stage::Availability, slot(2, OTHER, day(1, 0), 2)).unwrap();
        book.add(Stage::Availability, slot(3, OTHER, day(2, 0), 2)).unwrap();

        assert!(matches!(
            book.remove(Stage::Availability, SlotId(2), ME),
            Err(Error::PermissionDenied(_))
        ));
        assert!(matches!(
            book.remove(Stage::Voting, SlotId(1), ME),
            Err(Error::StageBlocked { .. })
        ));
        book.remove(Stage::Availability, SlotId(1), ME).unwrap();

        assert_eq!(book.remove_member(OTHER), 2);
        assert!(book.is_empty());
    }
}
