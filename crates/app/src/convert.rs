//! Mapping between wire types and core models

use chrono::Duration;
use hangout_core::{
    AvailabilitySlot, HangoutConfig, HangoutEvent, HangoutId, MemberId, SlotId, Stage, Suggestion,
    SuggestionId, SuggestionsSnapshot,
};
use hangout_net::dto::{AvailabilitySlotDto, HangoutDetails, SuggestionDto, SuggestionsPayload};
use hangout_net::{ConflictStage, Signal};

/// Schedule, stage and leader described by the details endpoint
pub struct HangoutState {
    pub config: HangoutConfig,
    pub stage: Stage,
    pub leader: Option<MemberId>,
}

pub fn stage_from_wire(value: u8) -> hangout_core::Result<Stage> {
    Stage::try_from(value).map_err(hangout_core::Error::InvalidOperation)
}

fn period(name: &str, millis: i64) -> hangout_core::Result<Duration> {
    Duration::try_milliseconds(millis).ok_or_else(|| {
        hangout_core::Error::InvalidOperation(format!("{} period is out of range", name))
    })
}

pub fn hangout_state(details: &HangoutDetails) -> hangout_core::Result<HangoutState> {
    let config = HangoutConfig::new(
        HangoutId::new(details.hangout_id.clone()),
        period("availability", details.availability_period)?,
        period("suggestions", details.suggestions_period)?,
        period("voting", details.voting_period)?,
        details.created_on_timestamp,
    )?;

    Ok(HangoutState {
        config,
        stage: stage_from_wire(details.current_stage)?,
        leader: details.leader_member_id.map(MemberId),
    })
}

pub fn suggestion(dto: SuggestionDto) -> Suggestion {
    Suggestion {
        id: SuggestionId(dto.suggestion_id),
        member_id: dto.hangout_member_id.map(MemberId),
        title: dto.suggestion_title,
        description: dto.suggestion_description,
        start: dto.suggestion_start_timestamp,
        end: dto.suggestion_end_timestamp,
        is_edited: dto.is_edited,
        likes_count: dto.likes_count,
        votes_count: dto.votes_count,
    }
}

pub fn suggestions_snapshot(payload: SuggestionsPayload) -> SuggestionsSnapshot {
    SuggestionsSnapshot {
        suggestions: payload.suggestions.into_iter().map(suggestion).collect(),
        member_likes: payload.member_likes.into_iter().map(SuggestionId).collect(),
        member_votes: payload.member_votes.into_iter().map(SuggestionId).collect(),
    }
}

pub fn slot(dto: AvailabilitySlotDto) -> AvailabilitySlot {
    AvailabilitySlot::new(
        SlotId(dto.availability_slot_id),
        MemberId(dto.hangout_member_id),
        dto.slot_start_timestamp,
        dto.slot_end_timestamp,
    )
}

pub fn conflict_stage(stage: ConflictStage) -> Stage {
    match stage {
        ConflictStage::Availability => Stage::Availability,
        ConflictStage::Suggestions => Stage::Suggestions,
        ConflictStage::Voting => Stage::Voting,
        ConflictStage::Concluded => Stage::Conclusion,
    }
}

/// Session event for a feed signal. Joins need no local change.
pub fn hangout_event(signal: Signal) -> Option<HangoutEvent> {
    match signal {
        Signal::StageChanged { new_stage } => match Stage::try_from(new_stage) {
            Ok(stage) => Some(HangoutEvent::StageChanged(stage)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring stage signal");
                None
            }
        },
        Signal::MemberJoined { .. } => None,
        Signal::MemberLeft { hangout_member_id } => {
            Some(HangoutEvent::MemberLeft(MemberId(hangout_member_id)))
        }
        Signal::LeaderChanged { leader_member_id } => {
            Some(HangoutEvent::LeaderChanged(leader_member_id.map(MemberId)))
        }
        Signal::SuggestionDeleted { suggestion_id } => {
            Some(HangoutEvent::SuggestionDeleted(SuggestionId(suggestion_id)))
        }
        Signal::HangoutDeleted => Some(HangoutEvent::HangoutDeleted),
        Signal::HangoutConcluded => Some(HangoutEvent::Concluded),
    }
}
