//! Signal feed messages
//!
//! All messages are JSON-serialized and length-prefixed on the wire.

use serde::{Deserialize, Serialize};

/// Out-of-band change to a hangout pushed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Signal {
    StageChanged { new_stage: u8 },
    MemberJoined { hangout_member_id: i64 },
    MemberLeft { hangout_member_id: i64 },
    LeaderChanged { leader_member_id: Option<i64> },
    SuggestionDeleted { suggestion_id: i64 },
    HangoutDeleted,
    HangoutConcluded,
}

/// Signal feed protocol messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum FeedMessage {
    /// Client asks for a hangout's signals
    Subscribe {
        hangout_id: String,
        hangout_member_id: i64,
    },

    /// Server accepted the subscription
    Subscribed { hangout_id: String },

    /// Server refused the subscription
    Rejected { reason: String },

    /// A change to the subscribed hangout
    Signal {
        hangout_id: String,
        signal: Signal,
    },

    /// Keepalive
    Ping,

    Pong,
}

impl FeedMessage {
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_wire_shape() {
        let msg = FeedMessage::Signal {
            hangout_id: "h1".to_string(),
            signal: Signal::StageChanged { new_stage: 3 },
        };

        let value: serde_json::Value = serde_json::from_slice(&msg.to_bytes().unwrap()).unwrap();
        assert_eq!(value["type"], "Signal");
        assert_eq!(value["hangoutId"], "h1");
        assert_eq!(value["signal"]["signal"], "stageChanged");
        assert_eq!(value["signal"]["newStage"], 3);
    }

    #[test]
    fn test_parse_server_signal() {
        let raw = br#"{"type":"Signal","hangoutId":"h1","signal":{"signal":"leaderChanged","leaderMemberId":null}}"#;
        let decoded = FeedMessage::from_bytes(raw).unwrap();
        assert_eq!(
            decoded,
            FeedMessage::Signal {
                hangout_id: "h1".to_string(),
                signal: Signal::LeaderChanged { leader_member_id: None },
            }
        );
    }
}
