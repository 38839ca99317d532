//! Session/auth gate.
//!
//! Validates credentials against the identity store, rejects banned
//! accounts at login time, and owns the single persisted session
//! snapshot. Registration and administrator seeding live here too.

pub mod password;

use crate::error::AuthError;
use crate::state::store::Store;
use crate::state::user::{NotificationPreferences, SchoolInfo, User, UserRole, UserStatus};
use argon2::PasswordHash;
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

/// Registration input. The confirmation copy is validated, never stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub stage: Option<String>,
    pub grade: Option<String>,
    pub school: Option<SchoolInfo>,
}

impl Store {
    /// Register a new student account.
    ///
    /// Fails without mutating anything on duplicate email, short password,
    /// or mismatched confirmation.
    pub fn register(&self, new: NewUser) -> Result<User, AuthError> {
        let email = new.email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidEmail(email));
        }
        let min = self.policy().min_password_len;
        if new.password.chars().count() < min {
            return Err(AuthError::PasswordTooShort(min));
        }
        if new.password != new.confirm {
            return Err(AuthError::PasswordMismatch);
        }

        // Hash outside the lock; the uniqueness check happens under it.
        let password_hash = password::hash_password(&new.password)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut state = self.state_mut();
        if state.user_by_email(&email).is_some() {
            return Err(AuthError::EmailTaken(email));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            email,
            role: UserRole::Student,
            stage: new.stage,
            grade: new.grade,
            password_hash,
            school: new.school,
            preferences: NotificationPreferences::default(),
            current_room: None,
            status: UserStatus::Active,
            blocked: HashSet::new(),
            violations: Vec::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        state.users.push(user.clone());
        self.persist_users(&state);

        info!(user = %user.id, email = %user.email, "Account registered");
        Ok(user)
    }

    /// Validate credentials and establish the session.
    ///
    /// Ban status is checked only after the password matched, so a wrong
    /// password on a banned account still reports `BadCredentials` and
    /// never leaks the ban to a failed credential guess.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let mut state = self.state_mut();
        let user = state
            .user_by_email(email)
            .cloned()
            .ok_or_else(|| AuthError::UnknownAccount(email.trim().to_string()))?;

        let stored = PasswordHash::new(&user.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let verified = password::verify_password(password, &stored)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !verified {
            return Err(AuthError::BadCredentials);
        }

        if user.status == UserStatus::Banned {
            return Err(AuthError::Banned);
        }

        state.session = Some(user.clone());
        self.persist_session(&state);
        info!(user = %user.id, "Login");
        Ok(user)
    }

    /// Drop the current session, if any.
    pub fn logout(&self) {
        let mut state = self.state_mut();
        if state.session.take().is_some() {
            self.persist_session(&state);
            debug!("Session cleared");
        }
    }

    /// The current session's live user record, or `None`.
    ///
    /// Re-reads the identity store so sanctions applied after login are
    /// observed on the next check; a banned or deleted user's session is
    /// dropped here.
    pub fn session_user(&self) -> Option<User> {
        let mut state = self.state_mut();
        let session = state.session.clone()?;

        match state.user(&session.id).cloned() {
            Some(live) if live.status != UserStatus::Banned => {
                if state.session.as_ref() != Some(&live) {
                    state.session = Some(live.clone());
                    self.persist_session(&state);
                }
                Some(live)
            }
            _ => {
                state.session = None;
                self.persist_session(&state);
                info!(user = %session.id, "Session invalidated");
                None
            }
        }
    }

    /// Seed the configured administrator account.
    ///
    /// Creates the account if the email is unknown; otherwise promotes the
    /// existing account to the admin role. Run once at startup.
    pub fn ensure_admin(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let mut state = self.state_mut();

        if let Some(idx) = state
            .users
            .iter()
            .position(|u| u.email.eq_ignore_ascii_case(email))
        {
            if state.users[idx].role != UserRole::Admin {
                state.users[idx].role = UserRole::Admin;
                self.persist_users(&state);
                info!(email = %email, "Existing account promoted to administrator");
            }
            return Ok(state.users[idx].clone());
        }

        let password_hash = password::hash_password(password)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: UserRole::Admin,
            stage: None,
            grade: None,
            password_hash,
            school: None,
            preferences: NotificationPreferences::default(),
            current_room: None,
            status: UserStatus::Active,
            blocked: HashSet::new(),
            violations: Vec::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        state.users.push(user.clone());
        self.persist_users(&state);

        info!(email = %email, "Administrator account seeded");
        Ok(user)
    }
}
