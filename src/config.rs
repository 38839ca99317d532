//! Configuration loading and management.

use crate::rooms::RoomKey;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Deployment configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Deployment identity.
    pub server: ServerConfig,
    /// Snapshot storage configuration.
    pub storage: StorageConfig,
    /// Administrator account seeded at startup.
    #[serde(default)]
    pub admin: Option<AdminConfig>,
    /// Text-generation upstream configuration.
    #[serde(default)]
    pub assistant: Option<AssistantConfig>,
    /// Registration policy.
    #[serde(default)]
    pub registration: RegistrationConfig,
    /// Stage/grade catalog used to enumerate class rooms.
    #[serde(default)]
    pub curriculum: Vec<StageConfig>,
}

/// Deployment identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Deployment name (e.g., "studyhall.example.org").
    pub name: String,
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the redb snapshot file.
    pub path: String,
}

/// Administrator block configuration.
///
/// The moderation console account; created on startup if absent.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Display name.
    pub name: String,
    /// Login email (unique across accounts).
    pub email: String,
    /// Password (hashed before storage).
    pub password: String,
}

/// Text-generation upstream configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// API key for the generative endpoint.
    pub api_key: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Registration policy.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Minimum accepted password length.
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

fn default_min_password_len() -> usize {
    8
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            min_password_len: default_min_password_len(),
        }
    }
}

/// One stage of the curriculum catalog and its grades.
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    /// Stage name (e.g., "primary").
    pub stage: String,
    /// Grade names within the stage.
    pub grades: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Enumerate every class room declared by the curriculum catalog.
    pub fn class_rooms(&self) -> Vec<RoomKey> {
        self.curriculum
            .iter()
            .flat_map(|stage| {
                stage
                    .grades
                    .iter()
                    .map(|grade| RoomKey::class(Some(&stage.stage), Some(grade)))
            })
            .collect()
    }
}
