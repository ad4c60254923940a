//! Command implementations.

pub mod admin;
pub mod catalog;
pub mod seed;

use std::path::Path;

use tracing::{error, info};

use orebi_catalog::config::DatabaseConfig;
use orebi_catalog::db::{ConnectionHint, MongoStore, RepositoryError};
use orebi_catalog::definition::{BUILTIN_CATALOGS, CatalogDefinition, CatalogError};

/// Load a built-in catalog by name, otherwise read `source` as a file path.
async fn load_catalog(source: &str) -> Result<CatalogDefinition, CatalogError> {
    if BUILTIN_CATALOGS.contains(&source) && !Path::new(source).exists() {
        return CatalogDefinition::builtin(source);
    }
    info!(path = %source, "Loading catalog from file");
    CatalogDefinition::from_yaml_file(source).await
}

/// Connect to MongoDB, logging the masked URI and a hint on failure.
async fn connect(config: &DatabaseConfig) -> Result<MongoStore, RepositoryError> {
    info!(uri = %config.redacted_uri(), "Connecting to MongoDB");

    match MongoStore::connect(config).await {
        Ok(store) => {
            info!(database = store.database_name(), "Connected to MongoDB");
            Ok(store)
        }
        Err(e) => {
            error!(error = %e, "MongoDB connection error");
            if let Some(hint) = ConnectionHint::classify(&e.to_string()) {
                error!("{hint}");
            }
            Err(e)
        }
    }
}
