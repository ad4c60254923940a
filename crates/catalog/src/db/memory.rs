//! In-process implementation of [`CatalogStore`].
//!
//! Behaves like the MongoDB store for everything the seeding workflow
//! relies on: generated ids, insertion order, delete-many counts, unique
//! user emails. Failures can be injected per operation to exercise the
//! workflow's error paths.
//!
//! Users are kept as raw BSON documents, so accounts written by other
//! applications can be planted with whatever fields they carry.

use std::collections::HashSet;

use async_trait::async_trait;
use bson::Document;
use tokio::sync::Mutex;

use orebi_core::Email;

use super::{CatalogStore, CollectionCounts, RepositoryError};
use crate::models::{BrandDocument, CategoryDocument, Identified, ProductDocument, UserDocument};

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    InsertCategories,
    InsertBrands,
    InsertProducts,
    ClearProducts,
    ClearCategories,
    ClearBrands,
    FindUser,
    InsertUser,
}

#[derive(Debug, Default)]
struct Collections {
    categories: Vec<CategoryDocument>,
    brands: Vec<BrandDocument>,
    products: Vec<ProductDocument>,
    users: Vec<Document>,
}

/// Catalog collections held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
    failures: Mutex<HashSet<Operation>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call of `operation` fail.
    pub async fn fail_on(&self, operation: Operation) {
        self.failures.lock().await.insert(operation);
    }

    /// Snapshot of the products collection.
    pub async fn products(&self) -> Vec<ProductDocument> {
        self.collections.lock().await.products.clone()
    }

    /// Snapshot of the categories collection.
    pub async fn categories(&self) -> Vec<CategoryDocument> {
        self.collections.lock().await.categories.clone()
    }

    /// Snapshot of the brands collection.
    pub async fn brands(&self) -> Vec<BrandDocument> {
        self.collections.lock().await.brands.clone()
    }

    /// Snapshot of the users collection, skipping documents that do not
    /// have the [`UserDocument`] shape.
    pub async fn users(&self) -> Vec<UserDocument> {
        self.collections
            .lock()
            .await
            .users
            .iter()
            .filter_map(|doc| bson::from_document(doc.clone()).ok())
            .collect()
    }

    /// Snapshot of the users collection as stored.
    pub async fn raw_users(&self) -> Vec<Document> {
        self.collections.lock().await.users.clone()
    }

    /// Store a user document verbatim.
    pub async fn insert_raw_user(&self, user: Document) {
        self.collections.lock().await.users.push(user);
    }

    async fn check(&self, operation: Operation) -> Result<(), RepositoryError> {
        if self.failures.lock().await.contains(&operation) {
            return Err(RepositoryError::Unavailable(format!(
                "injected failure for {operation:?}"
            )));
        }
        Ok(())
    }
}

fn with_ids<T: Identified>(mut documents: Vec<T>) -> Vec<T> {
    for document in &mut documents {
        document.ensure_id();
    }
    documents
}

fn has_email(users: &[Document], email: &Email) -> bool {
    users
        .iter()
        .any(|user| user.get_str("email").is_ok_and(|found| found == email.as_str()))
}

fn drain_count<T>(documents: &mut Vec<T>) -> u64 {
    let removed = documents.len() as u64;
    documents.clear();
    removed
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_categories(
        &self,
        categories: Vec<CategoryDocument>,
    ) -> Result<Vec<CategoryDocument>, RepositoryError> {
        self.check(Operation::InsertCategories).await?;
        let inserted = with_ids(categories);
        self.collections
            .lock()
            .await
            .categories
            .extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_brands(
        &self,
        brands: Vec<BrandDocument>,
    ) -> Result<Vec<BrandDocument>, RepositoryError> {
        self.check(Operation::InsertBrands).await?;
        let inserted = with_ids(brands);
        self.collections
            .lock()
            .await
            .brands
            .extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_products(
        &self,
        products: Vec<ProductDocument>,
    ) -> Result<Vec<ProductDocument>, RepositoryError> {
        self.check(Operation::InsertProducts).await?;
        let inserted = with_ids(products);
        self.collections
            .lock()
            .await
            .products
            .extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn clear_products(&self) -> Result<u64, RepositoryError> {
        self.check(Operation::ClearProducts).await?;
        Ok(drain_count(&mut self.collections.lock().await.products))
    }

    async fn clear_categories(&self) -> Result<u64, RepositoryError> {
        self.check(Operation::ClearCategories).await?;
        Ok(drain_count(&mut self.collections.lock().await.categories))
    }

    async fn clear_brands(&self) -> Result<u64, RepositoryError> {
        self.check(Operation::ClearBrands).await?;
        Ok(drain_count(&mut self.collections.lock().await.brands))
    }

    async fn user_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        self.check(Operation::FindUser).await?;
        Ok(has_email(&self.collections.lock().await.users, email))
    }

    async fn insert_user(&self, mut user: UserDocument) -> Result<UserDocument, RepositoryError> {
        self.check(Operation::InsertUser).await?;
        let mut collections = self.collections.lock().await;
        if has_email(&collections.users, &user.email) {
            return Err(RepositoryError::Conflict(format!(
                "user already exists with email: {}",
                user.email
            )));
        }
        user.ensure_id();
        let document = bson::to_document(&user)
            .map_err(|e| RepositoryError::Unavailable(format!("cannot encode user: {e}")))?;
        collections.users.push(document);
        Ok(user)
    }

    async fn counts(&self) -> Result<CollectionCounts, RepositoryError> {
        let collections = self.collections.lock().await;
        Ok(CollectionCounts {
            categories: collections.categories.len() as u64,
            brands: collections.brands.len() as u64,
            products: collections.products.len() as u64,
            users: collections.users.len() as u64,
        })
    }
}
