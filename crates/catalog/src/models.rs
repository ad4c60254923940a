//! Persisted document shapes.
//!
//! Field names are camelCase in the store (`isActive`, `soldQuantity`, ...)
//! and every document carries `createdAt`/`updatedAt` timestamps.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orebi_core::{DiscountPercent, Email, Price, ProductType, UserId, UserRole};

/// Collection names.
pub mod collections {
    pub const CATEGORIES: &str = "categories";
    pub const BRANDS: &str = "brands";
    pub const PRODUCTS: &str = "products";
    pub const USERS: &str = "users";
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub image: String,
    pub description: String,
    pub is_active: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// A product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub image: String,
    pub description: String,
    pub website: String,
    pub is_active: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// A catalog product.
///
/// `category` and `brand` hold the referenced entity's name, not its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "_type")]
    pub product_type: ProductType,
    pub name: String,
    pub images: Vec<String>,
    pub price: Price,
    pub discounted_percentage: DiscountPercent,
    pub stock: u32,
    pub sold_quantity: u32,
    pub category: String,
    pub brand: String,
    pub badge: bool,
    pub is_available: bool,
    pub offer: bool,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// A user account. Only the fields the seeding workflow writes are modeled.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: Email,
    /// One-way bcrypt password hash.
    pub password: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDocument")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl UserDocument {
    /// The user's id in its public string form, once persisted.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.id.map(|oid| UserId::new(oid.to_hex()))
    }
}

/// Documents that receive a generated id on insert.
pub trait Identified {
    fn id_mut(&mut self) -> &mut Option<ObjectId>;

    /// Assign a fresh id unless one is already set.
    fn ensure_id(&mut self) -> ObjectId {
        *self.id_mut().get_or_insert_with(ObjectId::new)
    }
}

macro_rules! impl_identified {
    ($($doc:ty),+ $(,)?) => {
        $(
            impl Identified for $doc {
                fn id_mut(&mut self) -> &mut Option<ObjectId> {
                    &mut self.id
                }
            }
        )+
    };
}

impl_identified!(
    CategoryDocument,
    BrandDocument,
    ProductDocument,
    UserDocument
);
