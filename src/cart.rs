//! Session cart and the cart x catalog join used by checkout and order
//! placement.
//!
//! The cart maps product-id strings to quantities. Quantities are plain
//! integers: they accumulate across adds and are intentionally not
//! validated as positive, bounded, or present in the catalog. Unknown
//! cart keys simply drop out of the join.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart(BTreeMap<String, i64>);

impl Cart {
    pub fn add(&mut self, product_id: &str, quantity: i64) {
        *self.0.entry(product_id.to_string()).or_insert(0) += quantity;
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.0.contains_key(product_id)
    }

    pub fn quantity(&self, product_id: &str) -> Option<i64> {
        self.0.get(product_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product: Product,
    pub quantity: i64,
    pub total: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Joins the cart against the catalog in catalog order. Each line total is
/// the unit price times the quantity rounded to two decimals; the grand
/// total is the rounded sum of line totals.
pub fn summarize(catalog: &[Product], cart: &Cart) -> (Vec<LineItem>, f64) {
    let mut items = Vec::new();
    let mut total = 0.0;

    for product in catalog {
        if let Some(quantity) = cart.quantity(&product.id.to_string()) {
            let line_total = round2(product.price * quantity as f64);
            total += line_total;
            items.push(LineItem {
                product: product.clone(),
                quantity,
                total: line_total,
            });
        }
    }

    (items, round2(total))
}
