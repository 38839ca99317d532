//! studyhall - community engine for a student learning platform.
//!
//! Partitions users into broadcast, class-based, and direct conversation
//! rooms, filters visibility through per-user block lists, enforces
//! account-level sanctions (mute/ban) in real time, and records abuse
//! reports for the moderation console.

pub mod assistant;
pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod moderation;
pub mod rooms;
pub mod state;

pub use state::store::Store;
