//! Message bus: publishing, per-viewer feeds, block lists, and presence.
//!
//! The message log is append-only; feeds are read-only projections that
//! never mutate it. Block lists hide a sender from the blocker's own
//! views only — they neither notify nor restrict the blocked party.

use crate::error::ChatError;
use crate::rooms::RoomKey;
use crate::state::message::ChatMessage;
use crate::state::store::Store;
use crate::state::user::{UserId, UserStatus};
use tracing::debug;
use uuid::Uuid;

/// Whether a message belongs to `room` from `viewer`'s perspective.
///
/// A direct conversation spans two addressed ids (each side addresses the
/// other's id), so both directions are unioned; every other room matches
/// its canonical id exactly.
fn addressed_to(message: &ChatMessage, viewer: &str, room: &RoomKey, canonical: &str) -> bool {
    match room {
        RoomKey::Direct(counterpart) => {
            (message.sender_id == viewer && message.room_id == *counterpart)
                || (message.sender_id == *counterpart && message.room_id == viewer)
        }
        _ => message.room_id == canonical,
    }
}

impl Store {
    /// Append a message to the log.
    ///
    /// Sender status is read under the write lock, so a mute applied
    /// after the caller's permission check cannot race this send. No
    /// user record is mutated.
    pub fn publish(
        &self,
        sender_id: &str,
        room: &RoomKey,
        text: &str,
    ) -> Result<ChatMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::NoTextToSend);
        }

        let mut state = self.state_mut();
        let (sender_name, status) = match state.user(sender_id) {
            Some(sender) => (sender.name.clone(), sender.status),
            None => return Err(ChatError::UnknownSender(sender_id.to_string())),
        };
        match status {
            UserStatus::Muted => return Err(ChatError::SenderSuppressed),
            UserStatus::Banned => return Err(ChatError::SenderBarred),
            UserStatus::Active => {}
        }
        if let RoomKey::Direct(counterpart) = room
            && state.user(counterpart).is_none()
        {
            return Err(ChatError::UnknownUser(counterpart.clone()));
        }

        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            sender_name,
            room_id: room.canonical_id(),
            text: text.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        state.messages.push(message.clone());
        self.persist_messages(&state);

        debug!(sender = %sender_id, room = %message.room_id, "Message published");
        Ok(message)
    }

    /// The room's messages as seen by one viewer, oldest first.
    ///
    /// Messages from senders on the viewer's block list are excluded;
    /// the filter has no effect on any other viewer's feed of the same
    /// room.
    pub fn viewer_feed(
        &self,
        viewer_id: &str,
        room: &RoomKey,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let state = self.state();
        let viewer = state
            .user(viewer_id)
            .ok_or_else(|| ChatError::UnknownUser(viewer_id.to_string()))?;
        let canonical = room.canonical_id();

        Ok(state
            .messages
            .iter()
            .filter(|m| addressed_to(m, viewer_id, room, &canonical))
            .filter(|m| !viewer.has_blocked(&m.sender_id))
            .cloned()
            .collect())
    }

    /// The room's member set, resolved from the current user collection.
    pub fn room_members(&self, viewer_id: &str, room: &RoomKey) -> Vec<UserId> {
        let state = self.state();
        room.members(viewer_id, &state.users)
    }

    /// Hide `target_id`'s messages from `owner_id`'s views.
    pub fn block_user(&self, owner_id: &str, target_id: &str) -> Result<(), ChatError> {
        if owner_id == target_id {
            return Err(ChatError::SelfBlock);
        }

        let mut state = self.state_mut();
        if state.user(target_id).is_none() {
            return Err(ChatError::UnknownUser(target_id.to_string()));
        }
        let inserted = {
            let owner = state
                .user_mut(owner_id)
                .ok_or_else(|| ChatError::UnknownUser(owner_id.to_string()))?;
            owner.blocked.insert(target_id.to_string())
        };
        if inserted {
            self.persist_users(&state);
            debug!(owner = %owner_id, target = %target_id, "User blocked");
        }
        Ok(())
    }

    /// Stop hiding `target_id`'s messages from `owner_id`'s views.
    ///
    /// Also clears stale entries for since-deleted accounts, so the
    /// target is not required to exist.
    pub fn unblock_user(&self, owner_id: &str, target_id: &str) -> Result<(), ChatError> {
        let mut state = self.state_mut();
        let removed = {
            let owner = state
                .user_mut(owner_id)
                .ok_or_else(|| ChatError::UnknownUser(owner_id.to_string()))?;
            owner.blocked.remove(target_id)
        };
        if removed {
            self.persist_users(&state);
            debug!(owner = %owner_id, target = %target_id, "User unblocked");
        }
        Ok(())
    }

    /// Mark the user as currently present in `room`.
    pub fn enter_room(&self, user_id: &str, room: &RoomKey) -> Result<(), ChatError> {
        let mut state = self.state_mut();
        let changed = {
            let user = state
                .user_mut(user_id)
                .ok_or_else(|| ChatError::UnknownUser(user_id.to_string()))?;
            let marker = Some(room.canonical_id());
            if user.current_room != marker {
                user.current_room = marker;
                true
            } else {
                false
            }
        };
        if changed {
            self.persist_users(&state);
        }
        Ok(())
    }

    /// Clear the user's presence marker.
    pub fn leave_room(&self, user_id: &str) -> Result<(), ChatError> {
        let mut state = self.state_mut();
        let changed = {
            let user = state
                .user_mut(user_id)
                .ok_or_else(|| ChatError::UnknownUser(user_id.to_string()))?;
            user.current_room.take().is_some()
        };
        if changed {
            self.persist_users(&state);
        }
        Ok(())
    }
}
