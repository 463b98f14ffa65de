//! Hangouts REST API surface

use async_trait::async_trait;

use crate::dto::{
    AvailabilityPayload, CreatedSlot, CreatedSuggestion, HangoutDetails, KickRequest,
    LeadershipTransfer, MemberRef, SlotDraft, SlotTarget, SlotUpdate, StageProgressed,
    SuggestionDraft, SuggestionTarget, SuggestionUpdate, SuggestionsPayload, UpdatedSuggestion,
};
use crate::error::Result;

/// Whether a like or vote is being added or withdrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkAction {
    Add,
    Remove,
}

/// Calls the client makes against the hangouts service
///
/// Implemented over HTTP by [`crate::HttpApi`]; tests supply their own.
#[async_trait]
pub trait HangoutApi: Send + Sync {
    async fn hangout_details(&self, hangout_id: &str) -> Result<HangoutDetails>;

    // Suggestions
    async fn fetch_suggestions(&self, member: &MemberRef) -> Result<SuggestionsPayload>;
    async fn create_suggestion(&self, draft: &SuggestionDraft) -> Result<CreatedSuggestion>;
    async fn update_suggestion(&self, update: &SuggestionUpdate) -> Result<UpdatedSuggestion>;
    async fn delete_suggestion(&self, target: &SuggestionTarget, as_leader: bool) -> Result<()>;
    async fn set_like(&self, target: &SuggestionTarget, action: MarkAction) -> Result<()>;
    async fn set_vote(&self, target: &SuggestionTarget, action: MarkAction) -> Result<()>;

    // Availability
    async fn fetch_availability(&self, member: &MemberRef) -> Result<AvailabilityPayload>;
    async fn create_slot(&self, draft: &SlotDraft) -> Result<CreatedSlot>;
    async fn update_slot(&self, update: &SlotUpdate) -> Result<()>;
    async fn delete_slot(&self, target: &SlotTarget) -> Result<()>;

    // Leader controls
    async fn progress_stage(&self, member: &MemberRef) -> Result<StageProgressed>;
    async fn claim_leadership(&self, member: &MemberRef) -> Result<()>;
    async fn transfer_leadership(&self, transfer: &LeadershipTransfer) -> Result<()>;
    async fn relinquish_leadership(&self, member: &MemberRef) -> Result<()>;
    async fn kick_member(&self, kick: &KickRequest) -> Result<()>;
}
