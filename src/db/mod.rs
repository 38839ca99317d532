//! Redb-backed snapshot persistence.
//!
//! The engine treats storage as a key-value blob store with load/save
//! operations only. Four independent collections are persisted:
//!
//! ```text
//! STATE: "users"    -> Vec<User>        (serde_json)
//!        "messages" -> Vec<ChatMessage> (serde_json)
//!        "reports"  -> Vec<Report>      (serde_json)
//!        "session"  -> User             (serde_json, absent when logged out)
//! ```
//!
//! Collections are loaded once at startup and saved after every mutation.

use crate::state::message::ChatMessage;
use crate::state::report::Report;
use crate::state::user::User;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Redb table holding the four collection blobs.
const STATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("state");

const USERS_KEY: &str = "users";
const MESSAGES_KEY: &str = "messages";
const REPORTS_KEY: &str = "reports";
const SESSION_KEY: &str = "session";

/// Errors from snapshot persistence.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("database error: {0}")]
    Open(#[from] redb::DatabaseError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Redb-backed blob store for the engine's persisted state.
pub struct SnapshotStore {
    db: Database,
}

impl SnapshotStore {
    /// Open (or create) the snapshot file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), error = %e, "Failed to create snapshot directory");
        }

        let db = Database::create(path)?;

        // Ensure the table exists so first reads don't fail.
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STATE_TABLE)?;
        }
        write_txn.commit()?;

        info!(path = %path.display(), "Snapshot store opened");
        Ok(Self { db })
    }

    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SnapshotError> {
        let blob = serde_json::to_vec(value)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STATE_TABLE)?;
            table.insert(key, blob.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SnapshotError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATE_TABLE)?;

        match table.get(key)? {
            Some(blob) => serde_json::from_slice(blob.value())
                .map(Some)
                .map_err(|e| SnapshotError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    fn remove_value(&self, key: &str) -> Result<(), SnapshotError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STATE_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn save_users(&self, users: &[User]) -> Result<(), SnapshotError> {
        self.save_value(USERS_KEY, &users)
    }

    pub fn load_users(&self) -> Result<Vec<User>, SnapshotError> {
        Ok(self.load_value(USERS_KEY)?.unwrap_or_default())
    }

    pub fn save_messages(&self, messages: &[ChatMessage]) -> Result<(), SnapshotError> {
        self.save_value(MESSAGES_KEY, &messages)
    }

    pub fn load_messages(&self) -> Result<Vec<ChatMessage>, SnapshotError> {
        Ok(self.load_value(MESSAGES_KEY)?.unwrap_or_default())
    }

    pub fn save_reports(&self, reports: &[Report]) -> Result<(), SnapshotError> {
        self.save_value(REPORTS_KEY, &reports)
    }

    pub fn load_reports(&self) -> Result<Vec<Report>, SnapshotError> {
        Ok(self.load_value(REPORTS_KEY)?.unwrap_or_default())
    }

    /// Persist the current session snapshot, or clear it on logout.
    pub fn save_session(&self, session: Option<&User>) -> Result<(), SnapshotError> {
        match session {
            Some(user) => self.save_value(SESSION_KEY, user),
            None => self.remove_value(SESSION_KEY),
        }
    }

    pub fn load_session(&self) -> Result<Option<User>, SnapshotError> {
        self.load_value(SESSION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::user::{NotificationPreferences, UserRole, UserStatus};
    use std::collections::HashSet;

    fn sample_user(id: &str) -> User {
        User {
            id: id.into(),
            name: "Sample".into(),
            email: format!("{id}@test"),
            role: UserRole::Student,
            stage: None,
            grade: None,
            password_hash: "hash".into(),
            school: None,
            preferences: NotificationPreferences::default(),
            current_room: None,
            status: UserStatus::Active,
            blocked: HashSet::new(),
            violations: Vec::new(),
            created_at: 1,
        }
    }

    #[test]
    fn missing_collections_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("snap.redb")).unwrap();

        assert!(store.load_users().unwrap().is_empty());
        assert!(store.load_messages().unwrap().is_empty());
        assert!(store.load_reports().unwrap().is_empty());
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn users_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.redb");

        {
            let store = SnapshotStore::open(&path).unwrap();
            store.save_users(&[sample_user("u1")]).unwrap();
        }

        let store = SnapshotStore::open(&path).unwrap();
        let users = store.load_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "u1");
    }

    #[test]
    fn session_clear_removes_the_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("snap.redb")).unwrap();

        let user = sample_user("u1");
        store.save_session(Some(&user)).unwrap();
        assert!(store.load_session().unwrap().is_some());

        store.save_session(None).unwrap();
        assert!(store.load_session().unwrap().is_none());
    }
}
