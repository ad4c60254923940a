//! Catalog definitions.
//!
//! A catalog is plain data: the categories, brands and products one seeding
//! run inserts. Products refer to their category and brand by name.
//!
//! ## YAML Format
//!
//! ```yaml
//! name: furniture
//! categories:
//!   - name: Chairs
//!     image: https://img.example/chairs.jpg
//!     description: Dining and office chairs
//! brands:
//!   - name: IKEA
//!     image: https://img.example/ikea.jpg
//!     description: Affordable furniture
//!     website: https://www.ikea.com
//! products:
//!   - type: furniture
//!     name: Ergonomic Office Chair
//!     images: [https://img.example/chair.jpg]
//!     price: 599.99
//!     discounted_percentage: 20
//!     stock: 30
//!     category: Chairs
//!     brand: IKEA
//!     tags: [ergonomic, office]
//!     created_days_ago: 7
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use orebi_core::{DiscountPercent, Price, ProductType};

use crate::policy::ReferencePolicy;

const FURNITURE_YAML: &str = include_str!("../catalogs/furniture.yaml");

/// Names accepted by [`CatalogDefinition::builtin`].
pub const BUILTIN_CATALOGS: &[&str] = &["furniture"];

/// Errors from loading a catalog definition.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unknown built-in catalog: {0}")]
    UnknownCatalog(String),

    #[error("invalid catalog: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}

/// A category to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub description: String,
}

/// A brand to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandSpec {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
}

/// A product to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpec {
    #[serde(rename = "type", default)]
    pub product_type: ProductType,
    pub name: String,
    pub images: Vec<String>,
    pub price: Price,
    #[serde(default)]
    pub discounted_percentage: DiscountPercent,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub sold_quantity: u32,
    /// Name of the category.
    pub category: String,
    /// Name of the brand.
    pub brand: String,
    #[serde(default)]
    pub badge: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub offer: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Backdate `createdAt` by this many days.
    #[serde(default)]
    pub created_days_ago: Option<u32>,
}

const fn default_true() -> bool {
    true
}

/// The data for one seeding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
    #[serde(default)]
    pub brands: Vec<BrandSpec>,
    #[serde(default)]
    pub products: Vec<ProductSpec>,
}

/// Something wrong with a catalog definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogProblem {
    EmptyName { kind: &'static str, index: usize },
    DuplicateName { kind: &'static str, name: String },
    DuplicateTag { product: String, tag: String },
    NoImages { product: String },
    UnknownReference {
        product: String,
        kind: &'static str,
        name: String,
    },
}

impl fmt::Display for CatalogProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName { kind, index } => write!(f, "{kind} #{} has an empty name", index + 1),
            Self::DuplicateName { kind, name } => write!(f, "duplicate {kind} name: {name}"),
            Self::DuplicateTag { product, tag } => {
                write!(f, "product {product:?} lists tag {tag:?} more than once")
            }
            Self::NoImages { product } => write!(f, "product {product:?} has no images"),
            Self::UnknownReference {
                product,
                kind,
                name,
            } => write!(f, "product {product:?} references unknown {kind} {name:?}"),
        }
    }
}

/// Outcome of [`CatalogDefinition::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogValidation {
    pub errors: Vec<CatalogProblem>,
    pub warnings: Vec<CatalogProblem>,
}

impl CatalogValidation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turn errors into a [`CatalogError::Invalid`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` listing every error, if there are any.
    pub fn into_result(self) -> Result<Vec<CatalogProblem>, CatalogError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(CatalogError::Invalid {
                problems: self.errors.iter().map(ToString::to_string).collect(),
            })
        }
    }
}

impl CatalogDefinition {
    /// The built-in furniture catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the embedded data is malformed.
    pub fn furniture() -> Result<Self, CatalogError> {
        Self::from_yaml_str(FURNITURE_YAML)
    }

    /// A built-in catalog by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownCatalog` for names not in
    /// [`BUILTIN_CATALOGS`].
    pub fn builtin(name: &str) -> Result<Self, CatalogError> {
        match name {
            "furniture" => Self::furniture(),
            other => Err(CatalogError::UnknownCatalog(other.to_owned())),
        }
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` on malformed YAML, unknown product types
    /// excepted (they become `generic`), negative prices and discounts above
    /// 100.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or
    /// `CatalogError::Parse` if it is not a valid catalog.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }

    /// Check the definition, collecting every problem.
    ///
    /// Unknown category or brand references are warnings under
    /// [`ReferencePolicy::Fallback`] and errors under
    /// [`ReferencePolicy::Strict`].
    #[must_use]
    pub fn validate(&self, policy: ReferencePolicy) -> CatalogValidation {
        let mut report = CatalogValidation::default();

        let category_names = unique_names(
            "category",
            self.categories.iter().map(|c| c.name.as_str()),
            &mut report,
        );
        let brand_names = unique_names(
            "brand",
            self.brands.iter().map(|b| b.name.as_str()),
            &mut report,
        );
        unique_names(
            "product",
            self.products.iter().map(|p| p.name.as_str()),
            &mut report,
        );

        for product in &self.products {
            if product.images.is_empty() {
                report.errors.push(CatalogProblem::NoImages {
                    product: product.name.clone(),
                });
            }

            let mut seen = HashSet::new();
            for tag in &product.tags {
                if !seen.insert(tag.as_str()) {
                    report.errors.push(CatalogProblem::DuplicateTag {
                        product: product.name.clone(),
                        tag: tag.clone(),
                    });
                }
            }

            for (kind, name, known) in [
                ("category", &product.category, &category_names),
                ("brand", &product.brand, &brand_names),
            ] {
                if !known.contains(name.as_str()) {
                    let problem = CatalogProblem::UnknownReference {
                        product: product.name.clone(),
                        kind,
                        name: name.clone(),
                    };
                    match policy {
                        ReferencePolicy::Fallback => report.warnings.push(problem),
                        ReferencePolicy::Strict => report.errors.push(problem),
                    }
                }
            }
        }

        report
    }

    /// List price times stock, summed over every product.
    ///
    /// Returns `None` when the total does not fit in a [`Price`].
    #[must_use]
    pub fn stock_value(&self) -> Option<Price> {
        self.products
            .iter()
            .map(|p| p.price.checked_times(p.stock))
            .try_fold(Price::ZERO, |total, value| total.checked_add(value?))
    }
}

fn unique_names<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
    report: &mut CatalogValidation,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for (index, name) in names.enumerate() {
        if name.trim().is_empty() {
            report.errors.push(CatalogProblem::EmptyName { kind, index });
        } else if !seen.insert(name) {
            report.errors.push(CatalogProblem::DuplicateName {
                kind,
                name: name.to_owned(),
            });
        }
    }
    seen
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SMALL: &str = r"
name: small
categories:
  - name: Chairs
    image: https://img.example/chairs.jpg
brands:
  - name: IKEA
    image: https://img.example/ikea.jpg
products:
  - name: Stool
    images: [https://img.example/stool.jpg]
    price: 19.5
    category: Chiars
    brand: IKEA
";

    #[test]
    fn test_furniture_catalog_loads() {
        let catalog = CatalogDefinition::furniture().unwrap();
        assert_eq!(catalog.name, "furniture");
        assert_eq!(catalog.categories.len(), 8);
        assert_eq!(catalog.brands.len(), 6);
        assert_eq!(catalog.products.len(), 23);
        assert!(
            catalog
                .products
                .iter()
                .all(|p| p.product_type == ProductType::Furniture)
        );
        assert_eq!(
            catalog
                .products
                .iter()
                .filter(|p| p.created_days_ago.is_some())
                .count(),
            3
        );
    }

    #[test]
    fn test_furniture_catalog_is_consistent() {
        let catalog = CatalogDefinition::furniture().unwrap();
        let report = catalog.validate(ReferencePolicy::Strict);
        assert_eq!(report, CatalogValidation::default());
    }

    #[test]
    fn test_defaults_applied() {
        let catalog = CatalogDefinition::from_yaml_str(SMALL).unwrap();
        let stool = catalog.products.first().unwrap();
        assert_eq!(stool.product_type, ProductType::Generic);
        assert_eq!(stool.discounted_percentage.as_u8(), 0);
        assert!(stool.is_available);
        assert!(!stool.badge);
        assert_eq!(stool.created_days_ago, None);
    }

    #[test]
    fn test_unknown_reference_depends_on_policy() {
        let catalog = CatalogDefinition::from_yaml_str(SMALL).unwrap();

        let lenient = catalog.validate(ReferencePolicy::Fallback);
        assert!(lenient.is_valid());
        assert_eq!(lenient.warnings.len(), 1);

        let strict = catalog.validate(ReferencePolicy::Strict);
        assert!(!strict.is_valid());
        let err = strict.into_result().unwrap_err();
        assert!(err.to_string().contains("unknown category \"Chiars\""));
    }

    #[test]
    fn test_collects_all_problems() {
        let mut catalog = CatalogDefinition::from_yaml_str(SMALL).unwrap();
        let chairs = catalog.categories.first().unwrap().clone();
        catalog.categories.push(chairs);
        let stool = catalog.products.get_mut(0).unwrap();
        stool.images.clear();
        stool.tags = vec!["wood".to_owned(), "wood".to_owned()];

        let report = catalog.validate(ReferencePolicy::Fallback);
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors.contains(&CatalogProblem::DuplicateName {
            kind: "category",
            name: "Chairs".to_owned(),
        }));
    }

    #[test]
    fn test_rejects_bad_values() {
        let negative = SMALL.replace("price: 19.5", "price: -1");
        assert!(matches!(
            CatalogDefinition::from_yaml_str(&negative),
            Err(CatalogError::Parse(_))
        ));

        let over = SMALL.replace("price: 19.5", "price: 19.5\n    discounted_percentage: 120");
        assert!(CatalogDefinition::from_yaml_str(&over).is_err());
    }

    #[test]
    fn test_stock_value() {
        let mut catalog = CatalogDefinition::from_yaml_str(SMALL).unwrap();
        catalog.products.get_mut(0).unwrap().stock = 4;
        assert_eq!(catalog.stock_value(), Some(Price::from_cents(7_800).unwrap()));

        let stool = catalog.products.get_mut(0).unwrap();
        stool.price = serde_json::from_str("50000000000000000000000000000").unwrap();
        stool.stock = 2;
        assert_eq!(catalog.stock_value(), None);
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(matches!(
            CatalogDefinition::builtin("electronics"),
            Err(CatalogError::UnknownCatalog(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = CatalogDefinition::from_yaml_file("/nonexistent/catalog.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
