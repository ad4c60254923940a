//! Persistence gateway for the catalog collections.
//!
//! # Collections
//!
//! - `categories` - Product categories
//! - `brands` - Product brands
//! - `products` - Catalog products (category and brand stored by name)
//! - `users` - Accounts; the seeding workflow only reads and inserts here
//!
//! # Backends
//!
//! - [`MongoStore`] - MongoDB, used by the CLI
//! - [`MemoryStore`] - In-process collections, used for dry runs and tests

pub mod memory;
pub mod mongo;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use orebi_core::Email;

use crate::models::{BrandDocument, CategoryDocument, ProductDocument, UserDocument};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Error from the MongoDB driver.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// The operation did not complete within the configured timeout.
    #[error("{operation} timed out after {}s", after.as_secs())]
    Timeout {
        /// Operation name.
        operation: &'static str,
        /// Configured limit.
        after: Duration,
    },

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The store refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Document counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionCounts {
    pub categories: u64,
    pub brands: u64,
    pub products: u64,
    pub users: u64,
}

/// Collection-level operations the seeding workflow needs.
///
/// Bulk inserts return the inserted documents, in input order, with their
/// generated ids set.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_categories(
        &self,
        categories: Vec<CategoryDocument>,
    ) -> Result<Vec<CategoryDocument>, RepositoryError>;

    async fn insert_brands(
        &self,
        brands: Vec<BrandDocument>,
    ) -> Result<Vec<BrandDocument>, RepositoryError>;

    async fn insert_products(
        &self,
        products: Vec<ProductDocument>,
    ) -> Result<Vec<ProductDocument>, RepositoryError>;

    /// Delete every product, returning how many were removed.
    async fn clear_products(&self) -> Result<u64, RepositoryError>;

    /// Delete every category, returning how many were removed.
    async fn clear_categories(&self) -> Result<u64, RepositoryError>;

    /// Delete every brand, returning how many were removed.
    async fn clear_brands(&self) -> Result<u64, RepositoryError>;

    /// Whether any account uses this (already normalized) email.
    ///
    /// Matches on the `email` field alone, whatever shape the rest of the
    /// account document has.
    async fn user_exists(&self, email: &Email) -> Result<bool, RepositoryError>;

    /// Insert one user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn insert_user(&self, user: UserDocument) -> Result<UserDocument, RepositoryError>;

    async fn counts(&self) -> Result<CollectionCounts, RepositoryError>;
}

/// Likely cause of a failed connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionHint {
    /// Host could not be resolved or reached.
    Network,
    /// Server rejected the credentials.
    Authentication,
    /// No server answered in time.
    Timeout,
}

impl ConnectionHint {
    /// Classify a connection error by its message.
    #[must_use]
    pub fn classify(message: &str) -> Option<Self> {
        let message = message.to_ascii_lowercase();
        if ["enotfound", "getaddrinfo", "dns", "failed to lookup", "resolve"]
            .iter()
            .any(|needle| message.contains(needle))
        {
            Some(Self::Network)
        } else if message.contains("authentication") || message.contains("auth failed") {
            Some(Self::Authentication)
        } else if message.contains("timeout") || message.contains("timed out") {
            Some(Self::Timeout)
        } else {
            None
        }
    }

    /// What the operator should check.
    #[must_use]
    pub const fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and MongoDB URI",
            Self::Authentication => "Check your MongoDB username and password",
            Self::Timeout => "Connection timed out. Check if MongoDB is running and accessible",
        }
    }
}

impl std::fmt::Display for ConnectionHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.advice())
    }
}
