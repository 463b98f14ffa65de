//! Classification of failed API responses
//!
//! The server answers failures with `{message, reason, resData}`. The
//! status code and `reason` together decide how the client recovers.

use serde::Deserialize;

/// Stage the server says the hangout is in when it rejects an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictStage {
    Availability,
    Suggestions,
    Voting,
    Concluded,
}

impl ConflictStage {
    fn from_reason(reason: &str) -> Option<Self> {
        match reason {
            "inAvailabilityStage" => Some(ConflictStage::Availability),
            "inSuggestionsStage" => Some(ConflictStage::Suggestions),
            "inVotingStage" => Some(ConflictStage::Voting),
            "hangoutConcluded" => Some(ConflictStage::Concluded),
            _ => None,
        }
    }

    /// Wire number of the stage (1-4)
    pub fn stage_number(&self) -> u8 {
        match self {
            ConflictStage::Availability => 1,
            ConflictStage::Suggestions => 2,
            ConflictStage::Voting => 3,
            ConflictStage::Concluded => 4,
        }
    }
}

/// Form field a server-side validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    Title,
    Description,
    DateTime,
}

impl FieldRef {
    fn from_reason(reason: &str) -> Option<Self> {
        match reason {
            "title" => Some(FieldRef::Title),
            "description" => Some(FieldRef::Description),
            "dateTime" => Some(FieldRef::DateTime),
            _ => None,
        }
    }
}

/// How the client should react to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Input rejected; the user can correct the named field
    Validation(Option<FieldRef>),
    /// The stage moved on the server since the last sync
    StageConflict(ConflictStage),
    /// Leadership changed; carries the current leader if known
    LeadershipConflict(Option<i64>),
    /// Entity is gone. `hangout_gone` means the whole hangout is.
    NotFound { hangout_gone: bool },
    AuthExpired,
    AuthInvalidated,
    RateLimited,
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: Option<String>,
    reason: Option<String>,
    res_data: Option<ResData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResData {
    leader_member_id: Option<i64>,
}

/// A non-success API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: u16,
    pub message: String,
    pub reason: Option<String>,
    pub leader_member_id: Option<i64>,
}

impl ApiFailure {
    /// Build from a status code and raw response body. Bodies that are
    /// not the usual JSON shape still produce a failure.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

        Self {
            status,
            message: parsed
                .message
                .unwrap_or_else(|| format!("Request failed with status {}", status)),
            reason: parsed.reason,
            leader_member_id: parsed.res_data.and_then(|d| d.leader_member_id),
        }
    }

    pub fn kind(&self) -> FailureKind {
        let reason = self.reason.as_deref().unwrap_or_default();

        match self.status {
            400 => FailureKind::Validation(FieldRef::from_reason(reason)),
            401 if reason == "authSessionExpired" => FailureKind::AuthExpired,
            401 => FailureKind::AuthInvalidated,
            404 => FailureKind::NotFound {
                hangout_gone: reason == "hangoutNotFound",
            },
            409 => {
                if let Some(stage) = ConflictStage::from_reason(reason) {
                    FailureKind::StageConflict(stage)
                } else if self.leader_member_id.is_some() || reason.contains("leader") {
                    FailureKind::LeadershipConflict(self.leader_member_id)
                } else {
                    FailureKind::Unknown
                }
            }
            429 => FailureKind::RateLimited,
            _ => FailureKind::Unknown,
        }
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}
