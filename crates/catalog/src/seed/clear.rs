//! Data-clearing step.
//!
//! Empties the products, categories and brands collections, in that order.
//! Users are never touched.

use std::fmt;

use tracing::{info, instrument, warn};

use super::SeedError;
use crate::db::{CatalogStore, RepositoryError};
use crate::models::collections;
use crate::policy::ClearPolicy;

/// Documents removed per collection. `None` means the delete failed and
/// the failure was tolerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub products: Option<u64>,
    pub categories: Option<u64>,
    pub brands: Option<u64>,
}

impl ClearReport {
    /// True when every collection was emptied.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.products.is_some() && self.categories.is_some() && self.brands.is_some()
    }
}

impl fmt::Display for ClearReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |count: Option<u64>| count.map_or_else(|| "failed".to_owned(), |n| n.to_string());
        write!(
            f,
            "products {}, categories {}, brands {}",
            show(self.products),
            show(self.categories),
            show(self.brands)
        )
    }
}

/// Delete every product, category and brand.
///
/// # Errors
///
/// Under [`ClearPolicy::FailFast`], returns `SeedError::Clear` for the first
/// collection that could not be emptied. Under [`ClearPolicy::BestEffort`]
/// failures are logged and this never fails.
#[instrument(skip(store))]
pub async fn clear_catalog<S: CatalogStore + ?Sized>(
    store: &S,
    policy: ClearPolicy,
) -> Result<ClearReport, SeedError> {
    let report = ClearReport {
        products: tolerate(collections::PRODUCTS, store.clear_products().await, policy)?,
        categories: tolerate(collections::CATEGORIES, store.clear_categories().await, policy)?,
        brands: tolerate(collections::BRANDS, store.clear_brands().await, policy)?,
    };

    if report.is_complete() {
        info!(%report, "Cleared existing data");
    } else {
        warn!(%report, "Existing data only partially cleared, continuing");
    }
    Ok(report)
}

fn tolerate(
    collection: &'static str,
    result: Result<u64, RepositoryError>,
    policy: ClearPolicy,
) -> Result<Option<u64>, SeedError> {
    match (result, policy) {
        (Ok(deleted), _) => Ok(Some(deleted)),
        (Err(source), ClearPolicy::FailFast) => Err(SeedError::Clear { collection, source }),
        (Err(e), ClearPolicy::BestEffort) => {
            warn!(collection, error = %e, "Error clearing data");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::db::memory::Operation;

    #[tokio::test]
    async fn test_best_effort_keeps_going() {
        let store = MemoryStore::new();
        store.fail_on(Operation::ClearCategories).await;

        let report = clear_catalog(&store, ClearPolicy::BestEffort).await.unwrap();
        assert_eq!(
            report,
            ClearReport {
                products: Some(0),
                categories: None,
                brands: Some(0),
            }
        );
        assert!(!report.is_complete());
        assert_eq!(report.to_string(), "products 0, categories failed, brands 0");
    }

    #[tokio::test]
    async fn test_fail_fast_stops() {
        let store = MemoryStore::new();
        store.fail_on(Operation::ClearProducts).await;

        let err = clear_catalog(&store, ClearPolicy::FailFast).await.unwrap_err();
        assert!(matches!(
            err,
            SeedError::Clear {
                collection: "products",
                ..
            }
        ));
    }
}
