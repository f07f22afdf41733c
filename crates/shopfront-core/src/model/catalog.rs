// ── Catalog domain types ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// `name` or `title`, whichever the endpoint sent; never empty.
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    /// Absent means active.
    pub is_active: bool,
    pub available_stock: Option<i64>,
    pub image_url: Option<String>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.available_stock.is_none_or(|n| n > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub product_count: Option<u64>,
    pub is_active: bool,
}
