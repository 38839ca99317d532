//! Core state: data model and the shared store.

pub mod message;
pub mod report;
pub mod store;
pub mod user;

pub use message::ChatMessage;
pub use report::{Report, ReportCause, ReportStatus, ReportTarget};
pub use store::{RegistrationPolicy, Store, StoreStats};
pub use user::{SanctionKind, User, UserId, UserRole, UserStatus, ViolationKind, ViolationRecord};
