//! Raw response types for the `/api/v1/` endpoints.
//!
//! These mirror the wire exactly and tolerate the inconsistencies between
//! endpoint variants: nearly every field is optional, ids may arrive as
//! strings or numbers, and unmodeled fields are kept in `extra`.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── List payload ─────────────────────────────────────────────────────

/// A decoded list response before any shape interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawListPayload {
    /// The JSON body, whatever its shape.
    pub body: Value,
    /// Total count reported out of band (the `X-Total-Count` header).
    pub total_count: Option<i64>,
}

impl RawListPayload {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            total_count: None,
        }
    }

    pub fn with_total_count(mut self, total: i64) -> Self {
        self.total_count = Some(total);
        self
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Accept an id encoded either as a JSON string or a number.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

/// Optional variant of [`id_from_string_or_number`]; `null` and absence are `None`.
fn opt_id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "id_from_string_or_number")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(id)| id))
}

// ── Reservations ─────────────────────────────────────────────────────

/// Reservation, from `GET /api/v1/reservations` and `GET /api/v1/reservations/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    /// Seen as `PENDING`, `pending`, `CANCELED`, `cancelled`, `picked_up`, ...
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "opt_id_from_string_or_number")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "opt_id_from_string_or_number")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_first_name: Option<String>,
    #[serde(default)]
    pub customer_last_name: Option<String>,
    /// Combined name, present on some list variants instead of the pair.
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_dni: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    /// ISO 8601 date-time.
    #[serde(default)]
    pub reserved_at: Option<String>,
    #[serde(default)]
    pub desired_pickup_date: Option<String>,
    #[serde(default)]
    pub picked_up_at: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Customers ────────────────────────────────────────────────────────

/// Customer, from `GET /api/v1/customers` (bare array) and `GET /api/v1/customers/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// National identity document.
    #[serde(default)]
    pub dni: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Products ─────────────────────────────────────────────────────────

/// Product: admin (`/api/v1/products`) and storefront (`/api/v1/public/products`) views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Some endpoints call the product name `title`.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "opt_id_from_string_or_number")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub available_stock: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_count: Option<u64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Sales ────────────────────────────────────────────────────────────

/// Sale, from `GET /api/v1/sales` and `GET /api/v1/sales/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sale_date: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub tax_amount: Option<f64>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default, deserialize_with = "opt_id_from_string_or_number")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_first_name: Option<String>,
    #[serde(default)]
    pub customer_last_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub cashier_email: Option<String>,
    #[serde(default)]
    pub items: Vec<SaleItemResponse>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemResponse {
    #[serde(default, deserialize_with = "opt_id_from_string_or_number")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_title: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub total_price: Option<f64>,
}
