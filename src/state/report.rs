//! Abuse reports and the support pseudo-target.

use crate::state::user::UserId;
use serde::{Deserialize, Serialize};

/// Reserved reported-party id for direct support requests.
///
/// Not a real account; the report ledger accepts it so support messages
/// flow through the same moderation console.
pub const SUPPORT_TARGET_ID: &str = "support";
pub(crate) const SUPPORT_TARGET_NAME: &str = "Support";
pub(crate) const SUPPORT_TARGET_EMAIL: &str = "support@studyhall";

/// Report lifecycle. `Pending` until an administrator acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

/// Closed set of report causes; free-form detail goes in the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportCause {
    /// Abusive or inappropriate behavior.
    Abuse,
    /// Non-educational content.
    OffTopic,
    /// Spam or repeated messages.
    Spam,
    Impersonation,
    /// Direct support request.
    Support,
    Other,
}

impl ReportCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abuse => "abuse",
            Self::OffTopic => "off_topic",
            Self::Spam => "spam",
            Self::Impersonation => "impersonation",
            Self::Support => "support",
            Self::Other => "other",
        }
    }
}

/// Who a report is filed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    User(UserId),
    /// The support pseudo-target ([`SUPPORT_TARGET_ID`]).
    Support,
}

/// One filed report.
///
/// Reporter and reported parties are denormalized at filing time; the id
/// fields are weak references (lookup only, not ownership). The status
/// field is the only part that ever changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub reporter_id: UserId,
    pub reporter_name: String,
    pub reporter_email: String,
    pub reported_id: UserId,
    pub reported_name: String,
    pub reported_email: String,
    pub cause: ReportCause,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub status: ReportStatus,
}
