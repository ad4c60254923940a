//! Catalog inspection.

use std::error::Error;

use tracing::{error, info, warn};

use orebi_catalog::policy::ReferencePolicy;

/// Validate a catalog and log what it contains.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or has validation
/// errors.
pub async fn show(source: &str, policy: ReferencePolicy) -> Result<(), Box<dyn Error>> {
    let catalog = super::load_catalog(source).await?;

    info!("Catalog: {}", catalog.name);
    info!("Categories: {}", catalog.categories.len());
    for category in &catalog.categories {
        let products = catalog
            .products
            .iter()
            .filter(|p| p.category == category.name)
            .count();
        info!("  {} ({products} products)", category.name);
    }

    info!("Brands: {}", catalog.brands.len());
    for brand in &catalog.brands {
        info!("  {}", brand.name);
    }

    info!("Products: {}", catalog.products.len());
    for product in &catalog.products {
        let sale = product.price.discounted(product.discounted_percentage);
        info!(
            "  {} - {} ({}% off: {sale}), stock {}",
            product.name,
            product.price,
            product.discounted_percentage.as_u8(),
            product.stock
        );
    }
    match catalog.stock_value() {
        Some(value) => info!("Stock value at list price: {value}"),
        None => warn!("Stock value at list price exceeds the representable range"),
    }

    let validation = catalog.validate(policy);
    for problem in &validation.warnings {
        warn!("  - {problem}");
    }
    if !validation.is_valid() {
        error!("Catalog validation failed:");
        for problem in &validation.errors {
            error!("  - {problem}");
        }
        return Err(format!("{} validation errors found", validation.errors.len()).into());
    }

    info!("Catalog validated successfully");
    Ok(())
}
