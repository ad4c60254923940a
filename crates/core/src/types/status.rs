//! Role and classification enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Account role stored on a user document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access to store management.
    Admin,
    /// Regular storefront shopper.
    #[default]
    Customer,
}

impl UserRole {
    /// The persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Storefront listing a product is tagged for.
///
/// Unknown tags deserialize to [`ProductType::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    NewArrivals,
    BestSellers,
    Electronics,
    Fashion,
    HomeKitchen,
    Furniture,
    #[default]
    #[serde(other)]
    Generic,
}

impl ProductType {
    /// The persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewArrivals => "new_arrivals",
            Self::BestSellers => "best_sellers",
            Self::Electronics => "electronics",
            Self::Fashion => "fashion",
            Self::HomeKitchen => "home_kitchen",
            Self::Furniture => "furniture",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "new_arrivals" => Self::NewArrivals,
            "best_sellers" => Self::BestSellers,
            "electronics" => Self::Electronics,
            "fashion" => Self::Fashion,
            "home_kitchen" => Self::HomeKitchen,
            "furniture" => Self::Furniture,
            _ => Self::Generic,
        })
    }
}
