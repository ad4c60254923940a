//! Reference catalog seeder: categories and brands.

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument};

use super::SeedError;
use crate::db::CatalogStore;
use crate::definition::{BrandSpec, CategorySpec};
use crate::models::{BrandDocument, CategoryDocument, collections};

/// Insert all categories in one batch.
///
/// Returns the inserted documents, ids set, in definition order.
///
/// # Errors
///
/// Returns `SeedError::Insert` if the store rejects the batch.
#[instrument(skip_all, fields(count = categories.len()))]
pub async fn seed_categories<S: CatalogStore + ?Sized>(
    store: &S,
    categories: &[CategorySpec],
    now: DateTime<Utc>,
) -> Result<Vec<CategoryDocument>, SeedError> {
    let documents = categories
        .iter()
        .map(|spec| CategoryDocument {
            id: None,
            name: spec.name.clone(),
            image: spec.image.clone(),
            description: spec.description.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .collect();

    let inserted = store.insert_categories(documents).await.map_err(|source| {
        error!(error = %source, "Error seeding categories");
        SeedError::Insert {
            collection: collections::CATEGORIES,
            source,
        }
    })?;

    info!(inserted = inserted.len(), "Seeded categories");
    Ok(inserted)
}

/// Insert all brands in one batch.
///
/// Returns the inserted documents, ids set, in definition order.
///
/// # Errors
///
/// Returns `SeedError::Insert` if the store rejects the batch.
#[instrument(skip_all, fields(count = brands.len()))]
pub async fn seed_brands<S: CatalogStore + ?Sized>(
    store: &S,
    brands: &[BrandSpec],
    now: DateTime<Utc>,
) -> Result<Vec<BrandDocument>, SeedError> {
    let documents = brands
        .iter()
        .map(|spec| BrandDocument {
            id: None,
            name: spec.name.clone(),
            image: spec.image.clone(),
            description: spec.description.clone(),
            website: spec.website.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .collect();

    let inserted = store.insert_brands(documents).await.map_err(|source| {
        error!(error = %source, "Error seeding brands");
        SeedError::Insert {
            collection: collections::BRANDS,
            source,
        }
    })?;

    info!(inserted = inserted.len(), "Seeded brands");
    Ok(inserted)
}
