//! Unified error handling for studyhall.
//!
//! Each component defines its own error enum; every enum classifies its
//! variants into a coarse [`ErrorKind`] and exposes a static code string
//! for structured log labeling.

use thiserror::Error;

/// Coarse error classification shared by all component errors.
///
/// No kind is fatal to the process; every failure is per-operation and
/// leaves prior state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, rejected before any mutation.
    Validation,
    /// The caller is not allowed to do this right now (banned login,
    /// muted publish, sanction against a protected role).
    Authorization,
    /// Unknown user, room, or report target.
    NotFound,
    /// The text-generation upstream failed; recovered with a fallback.
    Upstream,
    /// Unexpected internal failure (e.g. password hashing).
    Internal,
}

impl ErrorKind {
    /// Static label for metrics/log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Upstream => "upstream",
            Self::Internal => "internal",
        }
    }
}

// ============================================================================
// Auth Errors (session gate)
// ============================================================================

/// Errors from registration and the session/auth gate.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no account for {0}")]
    UnknownAccount(String),

    /// Password mismatch. Reported even for banned accounts so that a
    /// failed credential guess never leaks ban status.
    #[error("invalid credentials")]
    BadCredentials,

    #[error("account is banned")]
    Banned,

    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("password confirmation does not match")]
    PasswordMismatch,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownAccount(_) => ErrorKind::NotFound,
            Self::BadCredentials | Self::Banned => ErrorKind::Authorization,
            Self::EmailTaken(_)
            | Self::InvalidEmail(_)
            | Self::PasswordTooShort(_)
            | Self::PasswordMismatch => ErrorKind::Validation,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAccount(_) => "unknown_account",
            Self::BadCredentials => "bad_credentials",
            Self::Banned => "banned",
            Self::EmailTaken(_) => "email_taken",
            Self::InvalidEmail(_) => "invalid_email",
            Self::PasswordTooShort(_) => "password_too_short",
            Self::PasswordMismatch => "password_mismatch",
            Self::Internal(_) => "internal_error",
        }
    }
}

// ============================================================================
// Chat Errors (message bus)
// ============================================================================

/// Errors from publishing, feeds, block lists, and presence.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no text to send")]
    NoTextToSend,

    #[error("unknown sender: {0}")]
    UnknownSender(String),

    #[error("no such user: {0}")]
    UnknownUser(String),

    /// The sender is muted; publishing is suppressed until reactivation.
    #[error("sender is muted")]
    SenderSuppressed,

    /// The sender is banned. Distinct from [`ChatError::SenderSuppressed`]:
    /// a banned account cannot hold a session at all, so this only fires
    /// on a stale session racing a ban.
    #[error("sender is banned")]
    SenderBarred,

    #[error("cannot block yourself")]
    SelfBlock,
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoTextToSend | Self::SelfBlock => ErrorKind::Validation,
            Self::UnknownSender(_) | Self::UnknownUser(_) => ErrorKind::NotFound,
            Self::SenderSuppressed | Self::SenderBarred => ErrorKind::Authorization,
        }
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoTextToSend => "no_text_to_send",
            Self::UnknownSender(_) => "unknown_sender",
            Self::UnknownUser(_) => "unknown_user",
            Self::SenderSuppressed => "sender_suppressed",
            Self::SenderBarred => "sender_barred",
            Self::SelfBlock => "self_block",
        }
    }
}

// ============================================================================
// Moderation Errors (sanctions + report ledger)
// ============================================================================

/// Errors from the moderation controller and report ledger.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Every sanction transition requires a non-empty reason.
    #[error("sanction reason must not be empty")]
    EmptyReason,

    #[error("no such user: {0}")]
    UnknownUser(String),

    #[error("no such report: {0}")]
    UnknownReport(String),

    /// Administrators are exempt from sanctions. Surfaced as an error,
    /// not a silent skip, so callers can distinguish "not applicable"
    /// from "applied".
    #[error("cannot sanction protected account {0}")]
    ProtectedRole(String),
}

impl ModerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyReason => ErrorKind::Validation,
            Self::UnknownUser(_) | Self::UnknownReport(_) => ErrorKind::NotFound,
            Self::ProtectedRole(_) => ErrorKind::Authorization,
        }
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyReason => "empty_reason",
            Self::UnknownUser(_) => "unknown_user",
            Self::UnknownReport(_) => "unknown_report",
            Self::ProtectedRole(_) => "protected_role",
        }
    }
}
