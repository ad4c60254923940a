//! The seeding workflow.
//!
//! One run executes, strictly in order:
//!
//! 1. [`clear::clear_catalog`] - empty products, categories and brands
//! 2. [`reference::seed_categories`] and [`reference::seed_brands`]
//! 3. [`products::seed_products`] - resolve references, insert products
//! 4. [`admin::provision`] - optional admin account
//!
//! Steps 2 and 3 are fatal on failure. Whether step 1 is depends on the
//! [`ClearPolicy`]; step 4 never is. There is no transaction around the run:
//! a failure after the clear leaves the catalog partially seeded.

pub mod admin;
pub mod clear;
mod error;
pub mod products;
pub mod reference;

use std::fmt;

use chrono::Utc;
use tracing::{info, instrument, warn};

pub use admin::{ProvisionOptions, ProvisionOutcome};
pub use clear::ClearReport;
pub use error::SeedError;

use crate::config::{AdminSettings, SeedSettings};
use crate::db::CatalogStore;
use crate::definition::CatalogDefinition;
use crate::policy::{ClearPolicy, ReferencePolicy};

/// Options for one seeding run.
#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
    pub clear_policy: ClearPolicy,
    pub reference_policy: ReferencePolicy,
    pub admin: AdminSettings,
    pub provision: ProvisionOptions,
}

impl From<SeedSettings> for SeedOptions {
    fn from(settings: SeedSettings) -> Self {
        Self {
            clear_policy: settings.clear_policy,
            reference_policy: settings.reference_policy,
            admin: settings.admin,
            provision: ProvisionOptions {
                reveal_password: false,
                login_url: Some(settings.login_url),
            },
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Name of the catalog that was seeded.
    pub catalog: String,
    pub cleared: ClearReport,
    pub categories: usize,
    pub brands: usize,
    pub products: usize,
    pub admin: ProvisionOutcome,
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary ({} catalog):", self.catalog)?;
        writeln!(f, "- Cleared: {}", self.cleared)?;
        writeln!(f, "- Categories: {}", self.categories)?;
        writeln!(f, "- Brands: {}", self.brands)?;
        writeln!(f, "- Products: {}", self.products)?;
        write!(f, "- Admin: {}", self.admin)
    }
}

/// Clear the catalog collections and seed them from `catalog`.
///
/// The catalog is validated first; an invalid catalog aborts the run before
/// the store is touched.
///
/// # Errors
///
/// Returns `SeedError::InvalidCatalog` if validation fails,
/// `SeedError::Clear` if clearing fails under [`ClearPolicy::FailFast`],
/// `SeedError::UnresolvedReference` under [`ReferencePolicy::Strict`], and
/// `SeedError::Insert` if any bulk insert fails.
#[instrument(
    skip_all,
    fields(
        catalog = %catalog.name,
        clear_policy = %options.clear_policy,
        reference_policy = %options.reference_policy,
    )
)]
pub async fn run<S: CatalogStore + ?Sized>(
    store: &S,
    catalog: &CatalogDefinition,
    options: &SeedOptions,
) -> Result<SeedReport, SeedError> {
    let warnings = catalog.validate(options.reference_policy).into_result()?;
    for warning in &warnings {
        warn!(%warning, "Catalog warning");
    }

    info!("Starting database seeding");
    let now = Utc::now();

    let cleared = clear::clear_catalog(store, options.clear_policy).await?;
    let categories = reference::seed_categories(store, &catalog.categories, now).await?;
    let brands = reference::seed_brands(store, &catalog.brands, now).await?;
    let products = products::seed_products(
        store,
        &catalog.products,
        &categories,
        &brands,
        options.reference_policy,
        now,
    )
    .await?;
    let admin = admin::provision(store, &options.admin, &options.provision).await;

    info!(
        categories = categories.len(),
        brands = brands.len(),
        products = products.len(),
        "Database seeding completed"
    );

    Ok(SeedReport {
        catalog: catalog.name.clone(),
        cleared,
        categories: categories.len(),
        brands: brands.len(),
        products: products.len(),
        admin,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_furniture_run() {
        let store = MemoryStore::new();
        let catalog = CatalogDefinition::furniture().unwrap();

        let report = run(&store, &catalog, &SeedOptions::default()).await.unwrap();

        assert_eq!(report.categories, 8);
        assert_eq!(report.brands, 6);
        assert_eq!(report.products, 23);
        assert_eq!(report.admin, ProvisionOutcome::Skipped);
        assert_eq!(store.products().await.len(), 23);
    }

    #[tokio::test]
    async fn test_invalid_catalog_touches_nothing() {
        let store = MemoryStore::new();
        let mut catalog = CatalogDefinition::furniture().unwrap();
        catalog.brands.clear();

        let err = run(
            &store,
            &catalog,
            &SeedOptions {
                reference_policy: ReferencePolicy::Strict,
                ..SeedOptions::default()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SeedError::InvalidCatalog(_)));
        assert!(store.categories().await.is_empty());
    }

    #[test]
    fn test_report_display() {
        let report = SeedReport {
            catalog: "furniture".to_owned(),
            cleared: ClearReport {
                products: Some(23),
                categories: Some(8),
                brands: None,
            },
            categories: 8,
            brands: 6,
            products: 23,
            admin: ProvisionOutcome::Skipped,
        };
        let text = report.to_string();
        assert!(text.contains("- Products: 23"));
        assert!(text.contains("brands failed"));
        assert!(text.ends_with("- Admin: skipped (ADMIN_EMAIL and ADMIN_PASSWORD not set)"));
    }
}
