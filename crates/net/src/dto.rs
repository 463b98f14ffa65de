//! REST request and response bodies
//!
//! Field names are camelCase on the wire and timestamps are epoch
//! milliseconds. Ids stay plain integers here; the client maps them onto
//! its own types.

use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET hangouts/details`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HangoutDetails {
    pub hangout_id: String,
    /// Milliseconds
    pub availability_period: i64,
    pub suggestions_period: i64,
    pub voting_period: i64,
    #[serde(with = "ts_milliseconds")]
    pub created_on_timestamp: DateTime<Utc>,
    pub current_stage: u8,
    pub leader_member_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDto {
    pub suggestion_id: i64,
    pub hangout_member_id: Option<i64>,
    pub suggestion_title: String,
    pub suggestion_description: String,
    #[serde(with = "ts_milliseconds")]
    pub suggestion_start_timestamp: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub suggestion_end_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub votes_count: u32,
}

/// `GET suggestions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsPayload {
    pub suggestions: Vec<SuggestionDto>,
    #[serde(default)]
    pub member_likes: Vec<i64>,
    #[serde(default)]
    pub member_votes: Vec<i64>,
}

/// Body of `POST suggestions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDraft {
    pub hangout_id: String,
    pub hangout_member_id: i64,
    pub title: String,
    pub description: String,
    #[serde(with = "ts_milliseconds")]
    pub start_timestamp: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub end_timestamp: DateTime<Utc>,
}

/// Body of `PATCH suggestions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionUpdate {
    pub suggestion_id: i64,
    #[serde(flatten)]
    pub draft: SuggestionDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSuggestion {
    pub suggestion_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedSuggestion {
    pub is_major_change: bool,
}

/// Identifies one suggestion for delete, like and vote calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionTarget {
    pub hangout_id: String,
    pub hangout_member_id: i64,
    pub suggestion_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlotDto {
    pub availability_slot_id: i64,
    pub hangout_member_id: i64,
    #[serde(with = "ts_milliseconds")]
    pub slot_start_timestamp: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub slot_end_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPayload {
    pub availability_slots: Vec<AvailabilitySlotDto>,
}

/// Body of `POST availabilitySlots`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDraft {
    pub hangout_id: String,
    pub hangout_member_id: i64,
    #[serde(with = "ts_milliseconds")]
    pub slot_start_timestamp: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub slot_end_timestamp: DateTime<Utc>,
}

/// Body of `PATCH availabilitySlots`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotUpdate {
    pub availability_slot_id: i64,
    #[serde(flatten)]
    pub draft: SlotDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTarget {
    pub hangout_id: String,
    pub hangout_member_id: i64,
    pub availability_slot_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSlot {
    pub availability_slot_id: i64,
}

/// The acting member of a hangout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRef {
    pub hangout_id: String,
    pub hangout_member_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgressed {
    pub current_stage: u8,
}

/// Leader handing leadership to another member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipTransfer {
    pub hangout_id: String,
    pub hangout_member_id: i64,
    pub new_leader_member_id: i64,
}

/// Leader removing a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KickRequest {
    pub hangout_id: String,
    pub hangout_member_id: i64,
    pub member_to_kick_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_suggestion_wire_shape() {
        let json = r#"{
            "suggestionId": 7,
            "hangoutMemberId": null,
            "suggestionTitle": "Bowling",
            "suggestionDescription": "Lanes 3 and 4",
            "suggestionStartTimestamp": 1743508800000,
            "suggestionEndTimestamp": 1743516000000,
            "isEdited": true,
            "likesCount": 2,
            "votesCount": 1
        }"#;

        let dto: SuggestionDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.suggestion_id, 7);
        assert_eq!(dto.hangout_member_id, None);
        assert_eq!(
            dto.suggestion_start_timestamp,
            Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap()
        );
        assert!(dto.is_edited);
    }

    #[test]
    fn test_update_flattens_draft() {
        let update = SuggestionUpdate {
            suggestion_id: 3,
            draft: SuggestionDraft {
                hangout_id: "h1".to_string(),
                hangout_member_id: 9,
                title: "Dinner".to_string(),
                description: String::new(),
                start_timestamp: Utc.timestamp_millis_opt(1_000).unwrap(),
                end_timestamp: Utc.timestamp_millis_opt(2_000).unwrap(),
            },
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["suggestionId"], 3);
        assert_eq!(value["hangoutMemberId"], 9);
        assert_eq!(value["startTimestamp"], 1_000);
    }

    #[test]
    fn test_missing_marks_default_empty() {
        let payload: SuggestionsPayload = serde_json::from_str(r#"{"suggestions":[]}"#).unwrap();
        assert!(payload.member_likes.is_empty());
        assert!(payload.member_votes.is_empty());
    }
}
