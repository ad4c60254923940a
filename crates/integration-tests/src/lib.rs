//! Integration tests for Orebi.
//!
//! The workflow tests run the full seeding pipeline against
//! [`MemoryStore`], so no database is needed:
//!
//! ```bash
//! cargo test -p orebi-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `seed_workflow` - Clear, seed, reference resolution, policies
//! - `admin_provisioning` - Admin account creation gates and idempotency
//!
//! This crate holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::Utc;

use orebi_catalog::config::AdminSettings;
use orebi_catalog::db::{CatalogStore, MemoryStore};
use orebi_catalog::definition::CatalogDefinition;
use orebi_catalog::models::ProductDocument;
use orebi_catalog::seed::SeedOptions;
use orebi_core::{DiscountPercent, Price, ProductType};

/// Password that passes validation.
pub const ADMIN_PASSWORD: &str = "Sup3rSecret";

/// A three-product catalog. "Folding Stool" names the category `Chiars`,
/// which the catalog does not define.
///
/// # Panics
///
/// Panics if the fixture no longer parses.
#[must_use]
pub fn small_catalog() -> CatalogDefinition {
    CatalogDefinition::from_yaml_str(
        r"
name: small
categories:
  - name: Chairs
    image: https://img.example/chairs.jpg
    description: Dining and office chairs
  - name: Tables
    image: https://img.example/tables.jpg
brands:
  - name: IKEA
    image: https://img.example/ikea.jpg
    website: https://www.ikea.com
  - name: West Elm
    image: https://img.example/west-elm.jpg
products:
  - type: furniture
    name: Dining Chair
    images: [https://img.example/dining-chair.jpg]
    price: 149.99
    discounted_percentage: 10
    stock: 40
    category: Chairs
    brand: IKEA
    tags: [dining, wood]
  - type: furniture
    name: Coffee Table
    images: [https://img.example/coffee-table.jpg]
    price: 349.99
    stock: 12
    category: Tables
    brand: West Elm
    created_days_ago: 14
  - type: furniture
    name: Folding Stool
    images: [https://img.example/stool.jpg]
    price: 29.99
    category: Chiars
    brand: IKEA
",
    )
    .expect("fixture catalog is valid YAML")
}

/// Admin settings for `email` with a valid password.
#[must_use]
pub fn admin(email: &str) -> AdminSettings {
    AdminSettings::new(email, ADMIN_PASSWORD)
}

/// Seed options that provision `admin` with default policies.
#[must_use]
pub fn options_with_admin(admin: AdminSettings) -> SeedOptions {
    SeedOptions {
        admin,
        ..SeedOptions::default()
    }
}

/// A product left over from an earlier run.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn stale_product(name: &str) -> ProductDocument {
    let now = Utc::now();
    ProductDocument {
        id: None,
        product_type: ProductType::Generic,
        name: name.to_owned(),
        images: Vec::new(),
        price: Price::from_cents(100).expect("positive price"),
        discounted_percentage: DiscountPercent::default(),
        stock: 1,
        sold_quantity: 0,
        category: "Discontinued".to_owned(),
        brand: "Unknown".to_owned(),
        badge: false,
        is_available: false,
        offer: false,
        description: String::new(),
        tags: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// A store holding `count` stale products.
///
/// # Panics
///
/// Panics if the in-memory insert fails, which it only does when a failure
/// was injected.
pub async fn store_with_stale_products(count: usize) -> MemoryStore {
    let store = MemoryStore::new();
    let products = (0..count)
        .map(|i| stale_product(&format!("Stale {i}")))
        .collect();
    store
        .insert_products(products)
        .await
        .expect("memory insert succeeds");
    store
}
