//! User records and sanction state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unique user identifier (UUID v4, stringly keyed like room ids).
pub type UserId = String;

/// Account role. Exactly one per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Student,
    Admin,
}

/// Account moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    /// Can't send messages.
    Muted,
    /// Can't log in.
    Banned,
}

/// Administrative sanction actions.
///
/// Closed set: any state can transition to any other, and `Reactivate`
/// returns the account to [`UserStatus::Active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SanctionKind {
    Warning,
    Mute,
    Ban,
    Reactivate,
}

/// Violation kinds recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    Warning,
    Mute,
    Ban,
}

impl SanctionKind {
    /// The status an account ends up in after this sanction.
    pub fn applied_status(&self, current: UserStatus) -> UserStatus {
        match self {
            Self::Warning => current,
            Self::Mute => UserStatus::Muted,
            Self::Ban => UserStatus::Banned,
            Self::Reactivate => UserStatus::Active,
        }
    }

    /// The kind written into the violation record.
    ///
    /// A reactivation is logged as a warning-class entry rather than a
    /// distinct kind.
    pub fn recorded_kind(&self) -> ViolationKind {
        match self {
            Self::Warning | Self::Reactivate => ViolationKind::Warning,
            Self::Mute => ViolationKind::Mute,
            Self::Ban => ViolationKind::Ban,
        }
    }
}

/// Immutable audit entry for an applied sanction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// When the sanction was applied (Unix epoch milliseconds).
    pub at: i64,
    pub kind: ViolationKind,
    pub reason: String,
}

/// School metadata carried opaquely on the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolInfo {
    pub school_name: String,
    pub classroom: String,
}

/// Per-account notification toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub chat: bool,
    pub announcements: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            chat: true,
            announcements: true,
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Login email, unique across accounts.
    pub email: String,
    pub role: UserRole,
    /// Stage classification, if the student has one.
    pub stage: Option<String>,
    /// Grade within the stage.
    pub grade: Option<String>,
    /// Argon2 hash; the plaintext is never stored.
    pub password_hash: String,
    #[serde(default)]
    pub school: Option<SchoolInfo>,
    #[serde(default)]
    pub preferences: NotificationPreferences,
    /// Canonical id of the room the user is currently in, if any.
    #[serde(default)]
    pub current_room: Option<String>,
    pub status: UserStatus,
    /// Ids whose messages are hidden from this user's own views only.
    /// Never contains the owner's own id.
    #[serde(default)]
    pub blocked: HashSet<UserId>,
    /// Sanction history, append-only.
    #[serde(default)]
    pub violations: Vec<ViolationRecord>,
    /// When the account was created (Unix epoch milliseconds).
    pub created_at: i64,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether this user hides messages from `sender`.
    pub fn has_blocked(&self, sender: &str) -> bool {
        self.blocked.contains(sender)
    }

    /// Apply a sanction: update status per the transition table and append
    /// exactly one violation record.
    pub(crate) fn record_sanction(&mut self, kind: SanctionKind, reason: String) {
        self.status = kind.applied_status(self.status);
        self.violations.push(ViolationRecord {
            at: chrono::Utc::now().timestamp_millis(),
            kind: kind.recorded_kind(),
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "u1".into(),
            name: "Sample".into(),
            email: "sample@test".into(),
            role: UserRole::Student,
            stage: None,
            grade: None,
            password_hash: String::new(),
            school: None,
            preferences: NotificationPreferences::default(),
            current_room: None,
            status: UserStatus::Active,
            blocked: HashSet::new(),
            violations: Vec::new(),
            created_at: 0,
        }
    }

    #[test]
    fn warning_leaves_status_unchanged() {
        assert_eq!(
            SanctionKind::Warning.applied_status(UserStatus::Muted),
            UserStatus::Muted
        );
        assert_eq!(
            SanctionKind::Warning.applied_status(UserStatus::Active),
            UserStatus::Active
        );
    }

    #[test]
    fn transitions_are_total() {
        for current in [UserStatus::Active, UserStatus::Muted, UserStatus::Banned] {
            assert_eq!(
                SanctionKind::Mute.applied_status(current),
                UserStatus::Muted
            );
            assert_eq!(SanctionKind::Ban.applied_status(current), UserStatus::Banned);
            assert_eq!(
                SanctionKind::Reactivate.applied_status(current),
                UserStatus::Active
            );
        }
    }

    #[test]
    fn reactivation_is_recorded_as_warning() {
        assert_eq!(
            SanctionKind::Reactivate.recorded_kind(),
            ViolationKind::Warning
        );
    }

    #[test]
    fn record_sanction_appends_exactly_one_entry() {
        let mut user = sample_user();
        user.record_sanction(SanctionKind::Mute, "spam".into());
        assert_eq!(user.status, UserStatus::Muted);
        assert_eq!(user.violations.len(), 1);
        assert_eq!(user.violations[0].kind, ViolationKind::Mute);
        assert_eq!(user.violations[0].reason, "spam");
    }
}
