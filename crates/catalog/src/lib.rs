//! Orebi Catalog - persistence and seeding for the storefront catalog.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration (`MONGO_URI`, `ADMIN_*`, seeding policies)
//! - [`db`] - The [`CatalogStore`](db::CatalogStore) gateway with MongoDB and in-memory backends
//! - [`definition`] - Catalog definitions (categories, brands, products) loaded from YAML
//! - [`models`] - Persisted document shapes
//! - [`password`] - One-way password hashing
//! - [`policy`] - Clear and reference-resolution policies
//! - [`seed`] - The clear, seed, and admin provisioning workflow
//!
//! # Example
//!
//! ```no_run
//! use orebi_catalog::db::MemoryStore;
//! use orebi_catalog::definition::CatalogDefinition;
//! use orebi_catalog::seed::{self, SeedOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let catalog = CatalogDefinition::furniture()?;
//! let report = seed::run(&store, &catalog, &SeedOptions::default()).await?;
//! assert_eq!(report.products, catalog.products.len());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod definition;
pub mod models;
pub mod password;
pub mod policy;
pub mod seed;
