//! Chat messages.

use crate::state::user::UserId;
use serde::{Deserialize, Serialize};

/// One chat message, immutable once appended.
///
/// `room_id` is a canonical room id: the broadcast constant, a composed
/// class key, or the counterpart user's id for a direct conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: UserId,
    /// Sender display name at publish time.
    pub sender_name: String,
    pub room_id: String,
    pub text: String,
    /// Unix epoch milliseconds. Feed order is insertion order; the
    /// timestamp is informational and never reorders the log.
    pub timestamp: i64,
}
