//! Product catalog access.
//!
//! The catalog is a flat JSON file read fresh on every call. There is no
//! caching layer: the file is small, and re-reading it keeps edits live
//! without a restart. A missing or malformed file propagates up to the
//! request handler as an error response.

use std::{fs::read_to_string, path::Path};

use serde::{Deserialize, Serialize};

use crate::{cart::Cart, error::AppError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

pub fn load(path: &Path) -> Result<Vec<Product>, AppError> {
    let raw = read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub const MAX_RECOMMENDED: usize = 3;

/// Up to [`MAX_RECOMMENDED`] catalog entries not already in the cart,
/// in catalog order. No ranking, no personalization.
pub fn recommendations(products: &[Product], cart: &Cart) -> Vec<Product> {
    products
        .iter()
        .filter(|product| !cart.contains(&product.id.to_string()))
        .take(MAX_RECOMMENDED)
        .cloned()
        .collect()
}
