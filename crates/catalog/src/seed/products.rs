//! Product seeder.
//!
//! Each product names its category and brand; the names are resolved
//! against the documents inserted earlier in the same run.

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, instrument, warn};

use super::SeedError;
use crate::db::CatalogStore;
use crate::definition::ProductSpec;
use crate::models::{BrandDocument, CategoryDocument, ProductDocument, collections};
use crate::policy::ReferencePolicy;

/// Resolve `wanted` among `names`.
///
/// Under the fallback policy an unknown name is kept as written.
fn resolve<'a>(
    product: &str,
    kind: &'static str,
    wanted: &str,
    mut names: impl Iterator<Item = &'a str>,
    policy: ReferencePolicy,
) -> Result<String, SeedError> {
    if let Some(found) = names.find(|name| *name == wanted) {
        return Ok(found.to_owned());
    }
    match policy {
        ReferencePolicy::Fallback => {
            warn!(product, kind, name = wanted, "Reference not found, storing name as written");
            Ok(wanted.to_owned())
        }
        ReferencePolicy::Strict => Err(SeedError::UnresolvedReference {
            product: product.to_owned(),
            kind,
            name: wanted.to_owned(),
        }),
    }
}

/// Build the product documents without touching the store.
///
/// # Errors
///
/// Returns `SeedError::UnresolvedReference` under
/// [`ReferencePolicy::Strict`] for the first product whose category or
/// brand is missing from `categories`/`brands`.
pub fn build_products(
    products: &[ProductSpec],
    categories: &[CategoryDocument],
    brands: &[BrandDocument],
    policy: ReferencePolicy,
    now: DateTime<Utc>,
) -> Result<Vec<ProductDocument>, SeedError> {
    products
        .iter()
        .map(|spec| {
            let category = resolve(
                &spec.name,
                "category",
                &spec.category,
                categories.iter().map(|c| c.name.as_str()),
                policy,
            )?;
            let brand = resolve(
                &spec.name,
                "brand",
                &spec.brand,
                brands.iter().map(|b| b.name.as_str()),
                policy,
            )?;
            let created_at = spec
                .created_days_ago
                .map_or(now, |days| now - Duration::days(i64::from(days)));

            Ok(ProductDocument {
                id: None,
                product_type: spec.product_type,
                name: spec.name.clone(),
                images: spec.images.clone(),
                price: spec.price,
                discounted_percentage: spec.discounted_percentage,
                stock: spec.stock,
                sold_quantity: spec.sold_quantity,
                category,
                brand,
                badge: spec.badge,
                is_available: spec.is_available,
                offer: spec.offer,
                description: spec.description.clone(),
                tags: spec.tags.clone(),
                created_at,
                updated_at: now,
            })
        })
        .collect()
}

/// Resolve references and insert all products in one batch.
///
/// Nothing is inserted if resolution fails.
///
/// # Errors
///
/// Returns `SeedError::UnresolvedReference` (strict policy only) or
/// `SeedError::Insert` if the store rejects the batch.
#[instrument(skip_all, fields(count = products.len(), policy = %policy))]
pub async fn seed_products<S: CatalogStore + ?Sized>(
    store: &S,
    products: &[ProductSpec],
    categories: &[CategoryDocument],
    brands: &[BrandDocument],
    policy: ReferencePolicy,
    now: DateTime<Utc>,
) -> Result<Vec<ProductDocument>, SeedError> {
    let documents = build_products(products, categories, brands, policy, now)?;

    let inserted = store.insert_products(documents).await.map_err(|source| {
        error!(error = %source, "Error seeding products");
        SeedError::Insert {
            collection: collections::PRODUCTS,
            source,
        }
    })?;

    info!(inserted = inserted.len(), "Seeded products");
    Ok(inserted)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use orebi_core::{DiscountPercent, Price, ProductType};

    use super::*;
    use crate::db::MemoryStore;

    fn category(name: &str, now: DateTime<Utc>) -> CategoryDocument {
        CategoryDocument {
            id: None,
            name: name.to_owned(),
            image: String::new(),
            description: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn brand(name: &str, now: DateTime<Utc>) -> BrandDocument {
        BrandDocument {
            id: None,
            name: name.to_owned(),
            image: String::new(),
            description: String::new(),
            website: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn spec(category: &str, brand: &str) -> ProductSpec {
        ProductSpec {
            product_type: ProductType::Furniture,
            name: "Modern Leather Sofa Set".to_owned(),
            images: vec!["https://img.example/sofa.jpg".to_owned()],
            price: Price::from_cents(129_999).unwrap(),
            discounted_percentage: DiscountPercent::new(15).unwrap(),
            stock: 25,
            sold_quantity: 12,
            category: category.to_owned(),
            brand: brand.to_owned(),
            badge: true,
            is_available: true,
            offer: false,
            description: String::new(),
            tags: vec!["leather".to_owned()],
            created_days_ago: Some(7),
        }
    }

    #[test]
    fn test_resolves_and_backdates() {
        let now = Utc::now();
        let products = build_products(
            &[spec("Sofas & Couches", "West Elm")],
            &[category("Sofas & Couches", now)],
            &[brand("West Elm", now)],
            ReferencePolicy::Strict,
            now,
        )
        .unwrap();

        let sofa = products.first().unwrap();
        assert_eq!(sofa.category, "Sofas & Couches");
        assert_eq!(sofa.brand, "West Elm");
        assert_eq!(sofa.created_at, now - Duration::days(7));
        assert_eq!(sofa.updated_at, now);
    }

    #[test]
    fn test_fallback_keeps_literal_name() {
        let now = Utc::now();
        let products = build_products(
            &[spec("Sofas", "West Elm")],
            &[category("Sofas & Couches", now)],
            &[brand("West Elm", now)],
            ReferencePolicy::Fallback,
            now,
        )
        .unwrap();

        assert_eq!(products.first().unwrap().category, "Sofas");
    }

    #[tokio::test]
    async fn test_strict_inserts_nothing() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let err = seed_products(
            &store,
            &[spec("Sofas & Couches", "Wset Elm")],
            &[category("Sofas & Couches", now)],
            &[brand("West Elm", now)],
            ReferencePolicy::Strict,
            now,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            SeedError::UnresolvedReference { kind: "brand", .. }
        ));
        assert!(store.products().await.is_empty());
    }
}
