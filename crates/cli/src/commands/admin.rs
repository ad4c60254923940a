//! Admin account commands.
//!
//! # Usage
//!
//! ```bash
//! ADMIN_EMAIL=owner@example.com ADMIN_PASSWORD=... orebi-cli admin provision
//! ```
//!
//! # Environment Variables
//!
//! - `MONGO_URI` - MongoDB connection string
//! - `ADMIN_EMAIL`, `ADMIN_PASSWORD` - Account to create
//! - `ADMIN_NAME` - Display name (default: Admin)

use std::error::Error;

use tracing::info;

use orebi_catalog::config::{DatabaseConfig, SeedSettings};
use orebi_catalog::seed::admin::{self, ProvisionOptions, ProvisionOutcome};

/// Create the configured admin account unless it already exists.
///
/// Skipped, rejected and already-existing accounts are reported and
/// succeed; only a persistence or hashing failure is an error.
///
/// # Errors
///
/// Returns an error if `MONGO_URI` is missing, the connection fails, or the
/// account could not be stored.
pub async fn provision(show_credentials: bool) -> Result<(), Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;
    let settings = SeedSettings::from_env()?;
    let options = ProvisionOptions {
        reveal_password: show_credentials,
        login_url: Some(settings.login_url),
    };

    let store = super::connect(&config).await?;
    let outcome = admin::provision(&store, &settings.admin, &options).await;
    store.close().await;
    info!("Database connection closed");

    info!(%outcome, "Admin provisioning finished");
    match outcome {
        ProvisionOutcome::Failed { reason } => Err(format!("admin provisioning failed: {reason}").into()),
        _ => Ok(()),
    }
}
