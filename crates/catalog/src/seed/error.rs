//! Error types for the seeding workflow.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::definition::CatalogError;

/// Fatal errors that abort a seeding run.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The catalog definition failed validation.
    #[error(transparent)]
    InvalidCatalog(#[from] CatalogError),

    /// Clearing a collection failed under the fail-fast policy.
    #[error("failed to clear {collection}: {source}")]
    Clear {
        collection: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// A bulk insert failed.
    #[error("failed to insert {collection}: {source}")]
    Insert {
        collection: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// A product names a category or brand that was not inserted, under the
    /// strict reference policy.
    #[error("product {product:?} references unknown {kind} {name:?}")]
    UnresolvedReference {
        product: String,
        kind: &'static str,
        name: String,
    },
}
