//! Clear and reseed the catalog collections.
//!
//! # Environment Variables
//!
//! - `MONGO_URI` - MongoDB connection string (not needed with `--dry-run`)
//! - `MONGO_DB_NAME` - Database name override
//! - `ADMIN_EMAIL`, `ADMIN_PASSWORD`, `ADMIN_NAME` - Optional admin account
//! - `SEED_CLEAR_POLICY`, `SEED_REFERENCE_POLICY` - Failure policies

use std::error::Error;

use tracing::info;

use orebi_catalog::config::{DatabaseConfig, SeedSettings};
use orebi_catalog::db::MemoryStore;
use orebi_catalog::policy::{ClearPolicy, ReferencePolicy};
use orebi_catalog::seed::{self, SeedOptions, SeedReport};

/// Arguments of the `seed` command.
#[derive(Debug)]
pub struct SeedArgs {
    pub catalog: String,
    pub clear_policy: Option<ClearPolicy>,
    pub reference_policy: Option<ReferencePolicy>,
    pub dry_run: bool,
    pub show_credentials: bool,
}

/// Run the seeding workflow.
///
/// Configuration is checked before anything else: a missing `MONGO_URI`
/// fails without loading the catalog or connecting. The connection is
/// closed whether or not seeding succeeds.
///
/// # Errors
///
/// Returns an error if configuration is missing or invalid, the catalog
/// cannot be loaded, the connection fails, or seeding hits a fatal error.
pub async fn run(args: SeedArgs) -> Result<(), Box<dyn Error>> {
    let database = if args.dry_run {
        None
    } else {
        Some(DatabaseConfig::from_env()?)
    };

    let mut options = SeedOptions::from(SeedSettings::from_env()?);
    if let Some(policy) = args.clear_policy {
        options.clear_policy = policy;
    }
    if let Some(policy) = args.reference_policy {
        options.reference_policy = policy;
    }
    options.provision.reveal_password = args.show_credentials;

    let catalog = super::load_catalog(&args.catalog).await?;
    info!(
        catalog = %catalog.name,
        categories = catalog.categories.len(),
        brands = catalog.brands.len(),
        products = catalog.products.len(),
        "Loaded catalog"
    );

    let Some(config) = database else {
        info!("Dry run, seeding an in-memory store");
        let store = MemoryStore::new();
        let report = seed::run(&store, &catalog, &options).await?;
        log_summary(&report);
        return Ok(());
    };

    let store = super::connect(&config).await?;
    let result = seed::run(&store, &catalog, &options).await;
    store.close().await;
    info!("Database connection closed");

    let report = result?;
    log_summary(&report);
    Ok(())
}

fn log_summary(report: &SeedReport) {
    info!("Database seeding completed successfully!");
    for line in report.to_string().lines() {
        info!("{line}");
    }
}
