// ── Sale domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reconcile::CanonicalStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub status: CanonicalStatus,
    pub raw_status: Option<String>,
    pub sale_date: Option<DateTime<Utc>>,
    pub total_amount: Option<f64>,
    pub tax_amount: Option<f64>,
    pub discount_amount: Option<f64>,
    pub customer_id: Option<String>,
    /// Derived display name, never empty.
    pub customer_name: String,
    pub cashier_email: Option<String>,
    pub lines: Vec<SaleLine>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: Option<String>,
    pub product_title: String,
    pub quantity: u32,
    pub unit_price: Option<f64>,
    /// Reported line total, or `quantity * unit_price` when absent.
    pub total_price: Option<f64>,
}

impl Sale {
    /// Sum of line quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
