//! Session cart: a mapping of product id to desired quantity.
//!
//! The cart lives in the session under [`CART_SESSION_KEY`] and serializes as a
//! plain JSON object, `{"<product uuid>": <quantity>}`. Nothing here touches the
//! database; product existence is checked by the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const CART_SESSION_KEY: &str = "cart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<Uuid, i32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn quantity(&self, product_id: Uuid) -> Option<i32> {
        self.lines.get(&product_id).copied()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Uuid, i32)> + '_ {
        self.lines.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Increment by one, creating the line at 1 when absent.
    pub fn add(&mut self, product_id: Uuid) -> i32 {
        let qty = self.lines.entry(product_id).or_insert(0);
        *qty += 1;
        *qty
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: Uuid) -> bool {
        self.lines.remove(&product_id).is_some()
    }

    /// Step an existing line up or down by one. Lines that fall to zero or
    /// below are dropped. Unknown products are left alone.
    pub fn update(&mut self, product_id: Uuid, action: CartAction) -> Option<i32> {
        let qty = self.lines.get_mut(&product_id)?;
        match action {
            CartAction::Increase => *qty += 1,
            CartAction::Decrease => *qty -= 1,
        }
        if *qty <= 0 {
            self.lines.remove(&product_id);
            return None;
        }
        Some(*qty)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price * quantity` over the lines whose price is known.
    pub fn total(&self, price_of: impl Fn(Uuid) -> Option<i64>) -> i64 {
        self.lines()
            .filter_map(|(id, qty)| price_of(id).map(|price| line_subtotal(price, qty)))
            .sum()
    }
}

pub fn line_subtotal(price: i64, quantity: i32) -> i64 {
    price * i64::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_same_product_twice_yields_two() {
        let mut cart = Cart::new();
        let id = Uuid::new_v4();
        cart.add(id);
        assert_eq!(cart.add(id), 2);
        assert_eq!(cart.quantity(id), Some(2));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn decrease_to_zero_removes_line() {
        let mut cart = Cart::new();
        let id = Uuid::new_v4();
        cart.add(id);
        assert_eq!(cart.update(id, CartAction::Decrease), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn increase_steps_existing_line() {
        let mut cart = Cart::new();
        let id = Uuid::new_v4();
        cart.add(id);
        assert_eq!(cart.update(id, CartAction::Increase), Some(2));
    }

    #[test]
    fn update_ignores_products_not_in_cart() {
        let mut cart = Cart::new();
        let id = Uuid::new_v4();
        assert_eq!(cart.update(id, CartAction::Increase), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_reports_whether_line_existed() {
        let mut cart = Cart::new();
        let id = Uuid::new_v4();
        assert!(!cart.remove(id));
        cart.add(id);
        assert!(cart.remove(id));
        assert!(cart.is_empty());
    }

    #[test]
    fn total_skips_unpriced_lines() {
        let mut cart = Cart::new();
        let mug = Uuid::new_v4();
        let hoodie = Uuid::new_v4();
        let gone = Uuid::new_v4();
        cart.add(mug);
        cart.add(mug);
        cart.add(hoodie);
        cart.add(gone);

        let total = cart.total(|id| {
            if id == mug {
                Some(1_200)
            } else if id == hoodie {
                Some(5_500)
            } else {
                None
            }
        });
        assert_eq!(total, 2 * 1_200 + 5_500);
    }

    #[test]
    fn serializes_as_session_mapping() {
        let mut cart = Cart::new();
        let id = Uuid::parse_str("6f1c1a8e-7f9b-4a58-9a3f-0c2a1d2b3c4d").unwrap();
        cart.add(id);
        cart.add(id);
        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "6f1c1a8e-7f9b-4a58-9a3f-0c2a1d2b3c4d": 2 })
        );

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back.quantity(id), Some(2));
    }

    #[test]
    fn action_parses_lowercase_names() {
        let action: CartAction = serde_json::from_str("\"decrease\"").unwrap();
        assert_eq!(action, CartAction::Decrease);
        assert!(serde_json::from_str::<CartAction>("\"double\"").is_err());
    }
}
