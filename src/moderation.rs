//! Moderation controller and report ledger.
//!
//! The only component allowed to mutate sanction state. Sanctions are
//! administrator-initiated and total: any status can transition to any
//! other, and every transition appends exactly one violation record.

use crate::error::ModerationError;
use crate::state::report::{
    Report, ReportCause, ReportStatus, ReportTarget, SUPPORT_TARGET_EMAIL, SUPPORT_TARGET_ID,
    SUPPORT_TARGET_NAME,
};
use crate::state::store::Store;
use crate::state::user::{SanctionKind, User, UserStatus};
use tracing::info;
use uuid::Uuid;

impl Store {
    /// Apply a sanction to a user.
    ///
    /// Requires a non-empty reason. Administrators are exempt; the caller
    /// gets [`ModerationError::ProtectedRole`] rather than a silent skip.
    /// The new status is visible to any subsequent store read, including
    /// a polled session status check.
    pub fn apply_sanction(
        &self,
        user_id: &str,
        kind: SanctionKind,
        reason: &str,
    ) -> Result<User, ModerationError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ModerationError::EmptyReason);
        }

        let mut state = self.state_mut();
        let updated = {
            let user = state
                .user_mut(user_id)
                .ok_or_else(|| ModerationError::UnknownUser(user_id.to_string()))?;
            if user.is_admin() {
                return Err(ModerationError::ProtectedRole(user.id.clone()));
            }
            user.record_sanction(kind, reason.to_string());
            user.clone()
        };

        // A banned account cannot keep its session; otherwise the session
        // snapshot follows the live record.
        if state.session.as_ref().is_some_and(|s| s.id == updated.id) {
            state.session = if updated.status == UserStatus::Banned {
                None
            } else {
                Some(updated.clone())
            };
            self.persist_session(&state);
        }
        self.persist_users(&state);

        info!(
            user = %updated.id,
            kind = ?kind,
            status = ?updated.status,
            "Sanction applied"
        );
        Ok(updated)
    }

    /// Remove an account entirely. Administrative operation; the record
    /// and its violation history are gone, messages and reports keep
    /// their weak references.
    pub fn remove_user(&self, user_id: &str) -> Result<User, ModerationError> {
        let mut state = self.state_mut();
        let idx = state
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| ModerationError::UnknownUser(user_id.to_string()))?;
        let removed = state.users.remove(idx);

        if state.session.as_ref().is_some_and(|s| s.id == removed.id) {
            state.session = None;
            self.persist_session(&state);
        }
        self.persist_users(&state);

        info!(user = %removed.id, "Account removed");
        Ok(removed)
    }

    /// File an abuse report (or a support request against the reserved
    /// support target). Always succeeds for an existing reporter; the
    /// report starts `Pending`.
    pub fn file_report(
        &self,
        reporter_id: &str,
        target: ReportTarget,
        cause: ReportCause,
        description: Option<String>,
    ) -> Result<Report, ModerationError> {
        let mut state = self.state_mut();
        let reporter = state
            .user(reporter_id)
            .cloned()
            .ok_or_else(|| ModerationError::UnknownUser(reporter_id.to_string()))?;

        let (reported_id, reported_name, reported_email) = match &target {
            ReportTarget::User(id) => {
                let reported = state
                    .user(id)
                    .ok_or_else(|| ModerationError::UnknownUser(id.clone()))?;
                (
                    reported.id.clone(),
                    reported.name.clone(),
                    reported.email.clone(),
                )
            }
            ReportTarget::Support => (
                SUPPORT_TARGET_ID.to_string(),
                SUPPORT_TARGET_NAME.to_string(),
                SUPPORT_TARGET_EMAIL.to_string(),
            ),
        };

        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let report = Report {
            id: Uuid::new_v4().to_string(),
            reporter_id: reporter.id.clone(),
            reporter_name: reporter.name.clone(),
            reporter_email: reporter.email.clone(),
            reported_id,
            reported_name,
            reported_email,
            cause,
            description,
            created_at: chrono::Utc::now().timestamp_millis(),
            status: ReportStatus::Pending,
        };
        state.reports.push(report.clone());
        self.persist_reports(&state);

        info!(
            report = %report.id,
            reporter = %report.reporter_id,
            reported = %report.reported_id,
            cause = cause.as_str(),
            "Report filed"
        );
        Ok(report)
    }

    /// Transition a report's status. The status field is the only part of
    /// a report that ever changes.
    pub fn set_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<Report, ModerationError> {
        let mut state = self.state_mut();
        let updated = {
            let report = state
                .reports
                .iter_mut()
                .find(|r| r.id == report_id)
                .ok_or_else(|| ModerationError::UnknownReport(report_id.to_string()))?;
            report.status = status;
            report.clone()
        };
        self.persist_reports(&state);

        info!(report = %updated.id, status = ?status, "Report status updated");
        Ok(updated)
    }

    /// All accounts, for the moderation console.
    pub fn list_users(&self) -> Vec<User> {
        self.state().users.clone()
    }

    /// All reports, oldest first.
    pub fn list_reports(&self) -> Vec<Report> {
        self.state().reports.clone()
    }
}
