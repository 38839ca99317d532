//! studyhalld - Study Hall community daemon.
//!
//! Hosts the shared store for one deployment: loads configuration, opens
//! the snapshot store, seeds the administrator account, and keeps the
//! engine resident until shutdown.

use studyhall::config::Config;
use studyhall::db::SnapshotStore;
use studyhall::state::store::RegistrationPolicy;
use studyhall::Store;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(server = %config.server.name, "Starting studyhalld");

    // Open the snapshot store and load the four collections
    let snapshots = SnapshotStore::open(&config.storage.path)?;
    let policy = RegistrationPolicy {
        min_password_len: config.registration.min_password_len,
    };
    let store = Store::open(snapshots, policy)?;

    // Seed the configured administrator account
    if let Some(admin) = &config.admin {
        store
            .ensure_admin(&admin.name, &admin.email, &admin.password)
            .map_err(|e| anyhow::anyhow!("failed to seed administrator: {e}"))?;
    }

    let stats = store.stats();
    info!(
        users = stats.users,
        messages = stats.messages,
        reports = stats.reports,
        class_rooms = config.class_rooms().len(),
        "Store loaded"
    );

    // Mutations persist as they happen; just stay resident until shutdown.
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
