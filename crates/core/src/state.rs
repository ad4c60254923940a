//! Storefront session and cart state.
//!
//! The state is a plain value owned by the caller and handed to views by
//! reference. It only changes through [`reduce`], which is pure: the same
//! state and action always produce the same next state.
//!
//! ```
//! use orebi_core::state::{Action, CartItem, StoreState, reduce};
//! use orebi_core::{DiscountPercent, Price, ProductId};
//!
//! let item = CartItem {
//!     id: ProductId::new("p1"),
//!     name: "Accent Armchair".to_owned(),
//!     image: None,
//!     price: Price::from_cents(44_999).unwrap(),
//!     discount: DiscountPercent::default(),
//!     quantity: 1,
//! };
//!
//! let state = reduce(StoreState::default(), Action::AddToCart(item.clone()));
//! let state = reduce(state, Action::AddToCart(item));
//! assert_eq!(state.cart_item_count(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{DiscountPercent, Email, Price, ProductId, UserId, UserRole};

/// The signed-in user as shown by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    pub email: Email,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub price: Price,
    #[serde(rename = "discountedPercentage", default)]
    pub discount: DiscountPercent,
    pub quantity: u32,
}

impl CartItem {
    /// Discounted unit price times quantity, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.price
            .discounted(self.discount)
            .checked_times(self.quantity)
    }
}

/// Session and cart state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub user_info: Option<UserInfo>,
    pub cart: Vec<CartItem>,
    pub order_count: u32,
}

/// A state transition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Set the signed-in user (login or profile refresh).
    AddUser(UserInfo),
    /// Clear the signed-in user.
    RemoveUser,
    /// Add an item, merging quantities when the product is already present.
    AddToCart(CartItem),
    IncreaseQuantity(ProductId),
    /// Decrease a line's quantity; never drops below one.
    DecreaseQuantity(ProductId),
    DeleteItem(ProductId),
    ResetCart,
    SetOrderCount(u32),
    ResetOrderCount,
}

impl Action {
    /// Actions dispatched when the user logs out.
    #[must_use]
    pub const fn logout() -> [Self; 2] {
        [Self::RemoveUser, Self::ResetOrderCount]
    }
}

/// Apply `action` to `state`, returning the next state.
#[must_use]
pub fn reduce(mut state: StoreState, action: Action) -> StoreState {
    match action {
        Action::AddUser(user) => state.user_info = Some(user),
        Action::RemoveUser => state.user_info = None,
        Action::AddToCart(item) => {
            if let Some(line) = state.cart.iter_mut().find(|line| line.id == item.id) {
                line.quantity = line.quantity.saturating_add(item.quantity);
            } else {
                state.cart.push(item);
            }
        }
        Action::IncreaseQuantity(id) => {
            if let Some(line) = state.cart.iter_mut().find(|line| line.id == id) {
                line.quantity = line.quantity.saturating_add(1);
            }
        }
        Action::DecreaseQuantity(id) => {
            if let Some(line) = state.cart.iter_mut().find(|line| line.id == id) {
                line.quantity = line.quantity.saturating_sub(1).max(1);
            }
        }
        Action::DeleteItem(id) => state.cart.retain(|line| line.id != id),
        Action::ResetCart => state.cart.clear(),
        Action::SetOrderCount(count) => state.order_count = count,
        Action::ResetOrderCount => state.order_count = 0,
    }
    state
}

/// Apply a sequence of actions in order.
#[must_use]
pub fn reduce_all(state: StoreState, actions: impl IntoIterator<Item = Action>) -> StoreState {
    actions.into_iter().fold(state, reduce)
}

impl StoreState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.user_info.is_some()
    }

    /// Name to greet the user with: their name, or their email when unset.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.user_info.as_ref().map(|user| {
            user.name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| user.email.as_str())
        })
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn cart_item_count(&self) -> u32 {
        self.cart
            .iter()
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of discounted line totals, or `None` if the amount overflows.
    #[must_use]
    pub fn cart_subtotal(&self) -> Option<Price> {
        self.cart
            .iter()
            .map(CartItem::line_total)
            .try_fold(Price::ZERO, |total, line| total.checked_add(line?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, cents: i64, discount: u8) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            image: None,
            price: Price::from_cents(cents).unwrap(),
            discount: DiscountPercent::new(discount).unwrap(),
            quantity: 1,
        }
    }

    fn user(name: Option<&str>) -> UserInfo {
        UserInfo {
            id: UserId::new("u1"),
            name: name.map(str::to_owned),
            email: Email::parse("shopper@example.com").unwrap(),
            role: UserRole::Customer,
            avatar: None,
        }
    }

    #[test]
    fn test_add_to_cart_merges_same_product() {
        let state = reduce_all(
            StoreState::default(),
            [
                Action::AddToCart(item("a", 1_000, 0)),
                Action::AddToCart(item("b", 500, 0)),
                Action::AddToCart(item("a", 1_000, 0)),
            ],
        );
        assert_eq!(state.cart.len(), 2);
        assert_eq!(state.cart_item_count(), 3);
    }

    #[test]
    fn test_decrease_quantity_stops_at_one() {
        let state = reduce_all(
            StoreState::default(),
            [
                Action::AddToCart(item("a", 1_000, 0)),
                Action::IncreaseQuantity(ProductId::new("a")),
                Action::DecreaseQuantity(ProductId::new("a")),
                Action::DecreaseQuantity(ProductId::new("a")),
                Action::DecreaseQuantity(ProductId::new("a")),
            ],
        );
        assert_eq!(state.cart.first().unwrap().quantity, 1);
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let before = reduce(StoreState::default(), Action::AddToCart(item("a", 1_000, 0)));
        let after = reduce(before.clone(), Action::IncreaseQuantity(ProductId::new("zzz")));
        assert_eq!(before, after);
    }

    #[test]
    fn test_delete_and_reset_cart() {
        let state = reduce_all(
            StoreState::default(),
            [
                Action::AddToCart(item("a", 1_000, 0)),
                Action::AddToCart(item("b", 500, 0)),
                Action::DeleteItem(ProductId::new("a")),
            ],
        );
        assert_eq!(state.cart.len(), 1);
        assert!(reduce(state, Action::ResetCart).cart.is_empty());
    }

    #[test]
    fn test_subtotal_applies_discounts() {
        let state = reduce_all(
            StoreState::default(),
            [
                Action::AddToCart(item("a", 10_000, 25)),
                Action::AddToCart(item("b", 2_000, 0)),
                Action::IncreaseQuantity(ProductId::new("b")),
            ],
        );
        assert_eq!(
            state.cart_subtotal(),
            Some(Price::from_cents(11_500).unwrap())
        );
    }

    #[test]
    fn test_subtotal_overflow_is_none() {
        let mut line = item("a", 100, 0);
        line.price = serde_json::from_str("50000000000000000000000000000").unwrap();
        line.quantity = 3;
        let state = reduce(StoreState::default(), Action::AddToCart(line));

        assert_eq!(state.cart_subtotal(), None);
        assert_eq!(state.cart_item_count(), 3);
    }

    #[test]
    fn test_logout_clears_user_and_order_count() {
        let state = reduce_all(
            StoreState::default(),
            [
                Action::AddUser(user(Some("Jane"))),
                Action::SetOrderCount(4),
                Action::AddToCart(item("a", 1_000, 0)),
            ],
        );
        assert!(state.is_signed_in());

        let state = reduce_all(state, Action::logout());
        assert!(!state.is_signed_in());
        assert_eq!(state.order_count, 0);
        // The cart survives logout.
        assert_eq!(state.cart.len(), 1);
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let state = reduce(StoreState::default(), Action::AddUser(user(None)));
        assert_eq!(state.display_name(), Some("shopper@example.com"));

        let state = reduce(state, Action::AddUser(user(Some("Jane"))));
        assert_eq!(state.display_name(), Some("Jane"));
    }

    #[test]
    fn test_user_info_reads_profile_payload() {
        let json = r#"{"_id":"u42","name":"Jane","email":"jane@example.com","role":"admin"}"#;
        let info: UserInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.email.as_str(), "jane@example.com");
        assert_eq!(info.role, UserRole::Admin);
    }
}
