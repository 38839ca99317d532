//! The shared store.
//!
//! One owned object holds all users, messages, reports, and the current
//! session. Every component routes its mutations through named operations
//! on [`Store`]; nothing reaches into another component's fields. A single
//! write lock serializes all state-changing operations, so gating
//! conditions (muted/banned) are always evaluated against the state that
//! the mutation will actually commit over.

use crate::db::SnapshotStore;
use crate::state::message::ChatMessage;
use crate::state::report::Report;
use crate::state::user::User;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// Registration policy applied by the auth gate.
#[derive(Debug, Clone)]
pub struct RegistrationPolicy {
    /// Minimum accepted password length.
    pub min_password_len: usize,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            min_password_len: 8,
        }
    }
}

/// The four in-memory collections guarded by the store lock.
pub(crate) struct State {
    pub(crate) users: Vec<User>,
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) reports: Vec<Report>,
    pub(crate) session: Option<User>,
}

impl State {
    pub(crate) fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub(crate) fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub(crate) fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }
}

/// Collection sizes, for startup logging and the moderation console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub users: usize,
    pub messages: usize,
    pub reports: usize,
}

/// Single logical store shared by all connected clients of one deployment.
pub struct Store {
    state: RwLock<State>,
    snapshots: Option<SnapshotStore>,
    policy: RegistrationPolicy,
}

impl Store {
    /// Open the store backed by a snapshot file, loading all four
    /// collections.
    pub fn open(
        snapshots: SnapshotStore,
        policy: RegistrationPolicy,
    ) -> Result<Self, crate::db::SnapshotError> {
        let state = State {
            users: snapshots.load_users()?,
            messages: snapshots.load_messages()?,
            reports: snapshots.load_reports()?,
            session: snapshots.load_session()?,
        };
        Ok(Self {
            state: RwLock::new(state),
            snapshots: Some(snapshots),
            policy,
        })
    }

    /// An unbacked store with default policy. Mutations are not persisted.
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(State {
                users: Vec::new(),
                messages: Vec::new(),
                reports: Vec::new(),
                session: None,
            }),
            snapshots: None,
            policy: RegistrationPolicy::default(),
        }
    }

    pub fn policy(&self) -> &RegistrationPolicy {
        &self.policy
    }

    pub fn stats(&self) -> StoreStats {
        let state = self.state();
        StoreStats {
            users: state.users.len(),
            messages: state.messages.len(),
            reports: state.reports.len(),
        }
    }

    pub(crate) fn state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read()
    }

    pub(crate) fn state_mut(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write()
    }

    // Snapshot writes happen while the write lock is still held, so a
    // concurrent mutation can never interleave between commit and save.
    // Persistence failures are logged and do not roll back the in-memory
    // state.

    pub(crate) fn persist_users(&self, state: &State) {
        if let Some(snapshots) = &self.snapshots
            && let Err(e) = snapshots.save_users(&state.users)
        {
            warn!(error = %e, "Failed to persist users");
        }
    }

    pub(crate) fn persist_messages(&self, state: &State) {
        if let Some(snapshots) = &self.snapshots
            && let Err(e) = snapshots.save_messages(&state.messages)
        {
            warn!(error = %e, "Failed to persist messages");
        }
    }

    pub(crate) fn persist_reports(&self, state: &State) {
        if let Some(snapshots) = &self.snapshots
            && let Err(e) = snapshots.save_reports(&state.reports)
        {
            warn!(error = %e, "Failed to persist reports");
        }
    }

    pub(crate) fn persist_session(&self, state: &State) {
        if let Some(snapshots) = &self.snapshots
            && let Err(e) = snapshots.save_session(state.session.as_ref())
        {
            warn!(error = %e, "Failed to persist session");
        }
    }
}
