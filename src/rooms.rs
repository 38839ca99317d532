//! Room resolution.
//!
//! A room is a logical message-delivery scope identified by a canonical
//! key: the reserved broadcast room, a class room derived from a
//! (stage, grade) pair, or a direct conversation keyed by the counterpart
//! user's id. Resolution is pure: identical user collections yield
//! identical keys and member sets.

use crate::state::user::{User, UserId};
use std::fmt;

/// Canonical id of the broadcast room every user belongs to.
pub const BROADCAST_ROOM_ID: &str = "public";

/// Stable component used when a user's stage or grade is unset, so their
/// personal class room still resolves instead of failing.
pub const UNASSIGNED_SEGMENT: &str = "unassigned";

/// A validated room key.
///
/// Constructed through [`RoomKey::class`] and friends rather than string
/// concatenation, so a user id can never collide with a composed class
/// key at a call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoomKey {
    /// The shared room for all users.
    Broadcast,
    /// A class room; both segments are non-empty (possibly "unassigned").
    Class { stage: String, grade: String },
    /// A direct conversation with the given counterpart.
    Direct(UserId),
}

impl RoomKey {
    /// Build a class-room key, substituting the unassigned segment for
    /// missing or blank components.
    pub fn class(stage: Option<&str>, grade: Option<&str>) -> Self {
        fn segment(value: Option<&str>) -> String {
            match value.map(str::trim) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => UNASSIGNED_SEGMENT.to_string(),
            }
        }
        Self::Class {
            stage: segment(stage),
            grade: segment(grade),
        }
    }

    /// The class room a user belongs to.
    pub fn class_of(user: &User) -> Self {
        Self::class(user.stage.as_deref(), user.grade.as_deref())
    }

    /// A direct conversation with `counterpart`.
    pub fn direct(counterpart: impl Into<UserId>) -> Self {
        Self::Direct(counterpart.into())
    }

    /// Canonical room id used for message addressing and persistence.
    pub fn canonical_id(&self) -> String {
        match self {
            Self::Broadcast => BROADCAST_ROOM_ID.to_string(),
            Self::Class { stage, grade } => format!("{stage}_{grade}"),
            Self::Direct(counterpart) => counterpart.clone(),
        }
    }

    /// Compute the member set for this room from a store snapshot.
    ///
    /// Pure and side-effect-free; only users present in `users` are
    /// members, including the viewer themself.
    pub fn members(&self, viewer: &str, users: &[User]) -> Vec<UserId> {
        match self {
            Self::Broadcast => users.iter().map(|u| u.id.clone()).collect(),
            Self::Class { .. } => users
                .iter()
                .filter(|u| Self::class_of(u) == *self)
                .map(|u| u.id.clone())
                .collect(),
            Self::Direct(counterpart) => users
                .iter()
                .filter(|u| u.id == *counterpart || u.id == viewer)
                .map(|u| u.id.clone())
                .collect(),
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_id())
    }
}
