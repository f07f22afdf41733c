// ── API-to-domain conversions ──
//
// Bridges raw `shopfront_api::types` DTOs into the canonical model. Each
// conversion picks between alternate field names, parses timestamps and
// derives display fields. None of them can fail.

use chrono::{DateTime, NaiveDate, Utc};
use shopfront_api::Resource;
use shopfront_api::types::{
    CategoryResponse, CustomerResponse, ProductResponse, ReservationResponse, SaleItemResponse,
    SaleResponse,
};

use crate::model::{Category, Customer, Entity, Product, Reservation, Sale, SaleLine};
use crate::reconcile::names::non_blank;
use crate::reconcile::{
    CanonicalStatus, NameSources, PLACEHOLDER, StatusReconciler, SynonymTable,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Trimmed owned text, dropping blanks.
fn text(raw: Option<String>) -> Option<String> {
    non_blank(raw.as_deref()).map(str::to_owned)
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as midnight UTC.
/// Unparseable values are dropped.
fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = non_blank(raw)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn push_term<'a>(terms: &mut Vec<&'a str>, value: Option<&'a String>) {
    if let Some(v) = value {
        terms.push(v.as_str());
    }
}

// ── Reservations ───────────────────────────────────────────────────

impl Entity for Reservation {
    type Raw = ReservationResponse;
    const RESOURCE: Resource = Resource::Reservations;

    fn reconcile(raw: ReservationResponse, reconciler: &StatusReconciler) -> Self {
        let status = reconciler.reservation_status(raw.status.as_deref());
        let customer_name = NameSources {
            first_name: raw.customer_first_name.as_deref(),
            last_name: raw.customer_last_name.as_deref(),
            full_name: raw.customer_name.as_deref(),
            id: raw.customer_id.as_deref(),
        }
        .display_name();

        Self {
            code: non_blank(raw.code.as_deref()).unwrap_or(&raw.id).to_owned(),
            status,
            raw_status: raw.status,
            product_id: raw.product_id,
            product_name: text(raw.product_name),
            quantity: raw.quantity,
            total_amount: raw.total_amount,
            customer_id: raw.customer_id,
            customer_first_name: text(raw.customer_first_name),
            customer_last_name: text(raw.customer_last_name),
            customer_name,
            customer_document: text(raw.customer_dni),
            customer_email: text(raw.customer_email),
            customer_phone: text(raw.customer_phone),
            reserved_at: parse_datetime(raw.reserved_at.as_deref()),
            desired_pickup_date: parse_datetime(raw.desired_pickup_date.as_deref()),
            picked_up_at: parse_datetime(raw.picked_up_at.as_deref()),
            cancelled_at: parse_datetime(raw.cancelled_at.as_deref()),
            notes: text(raw.notes),
            id: raw.id,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn search_terms(&self) -> Vec<&str> {
        let mut terms = vec![self.code.as_str()];
        push_term(&mut terms, self.customer_document.as_ref());
        push_term(&mut terms, self.customer_email.as_ref());
        push_term(&mut terms, self.customer_first_name.as_ref());
        push_term(&mut terms, self.customer_last_name.as_ref());
        terms
    }

    fn status(&self) -> Option<&CanonicalStatus> {
        Some(&self.status)
    }

    fn status_table(reconciler: &StatusReconciler) -> Option<&SynonymTable> {
        Some(reconciler.reservation_table())
    }
}

// ── Customers ──────────────────────────────────────────────────────

impl From<CustomerResponse> for Customer {
    fn from(raw: CustomerResponse) -> Self {
        let display_name = NameSources {
            first_name: raw.first_name.as_deref(),
            last_name: raw.last_name.as_deref(),
            full_name: raw.full_name.as_deref(),
            id: Some(&raw.id),
        }
        .display_name();

        Self {
            first_name: text(raw.first_name),
            last_name: text(raw.last_name),
            display_name,
            email: text(raw.email),
            phone: text(raw.phone),
            document: text(raw.dni),
            notes: text(raw.notes),
            created_at: parse_datetime(raw.created_at.as_deref()),
            updated_at: parse_datetime(raw.updated_at.as_deref()),
            id: raw.id,
        }
    }
}

impl Entity for Customer {
    type Raw = CustomerResponse;
    const RESOURCE: Resource = Resource::Customers;

    fn reconcile(raw: CustomerResponse, _reconciler: &StatusReconciler) -> Self {
        raw.into()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn search_terms(&self) -> Vec<&str> {
        let mut terms = vec![self.display_name.as_str()];
        push_term(&mut terms, self.document.as_ref());
        push_term(&mut terms, self.email.as_ref());
        push_term(&mut terms, self.phone.as_ref());
        terms
    }
}

// ── Products ───────────────────────────────────────────────────────

impl From<ProductResponse> for Product {
    fn from(raw: ProductResponse) -> Self {
        let name = non_blank(raw.name.as_deref())
            .or_else(|| non_blank(raw.title.as_deref()))
            .unwrap_or(&raw.id)
            .to_owned();

        Self {
            name,
            description: text(raw.description),
            sku: text(raw.sku),
            price: raw.price,
            currency: text(raw.currency),
            category_id: raw.category_id,
            category_name: text(raw.category_name),
            is_active: raw.is_active.unwrap_or(true),
            available_stock: raw.available_stock,
            image_url: text(raw.image_url),
            id: raw.id,
        }
    }
}

impl Entity for Product {
    type Raw = ProductResponse;
    const RESOURCE: Resource = Resource::Products;

    fn reconcile(raw: ProductResponse, _reconciler: &StatusReconciler) -> Self {
        raw.into()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn search_terms(&self) -> Vec<&str> {
        let mut terms = vec![self.name.as_str()];
        push_term(&mut terms, self.sku.as_ref());
        push_term(&mut terms, self.category_name.as_ref());
        terms
    }
}

// ── Categories ─────────────────────────────────────────────────────

impl From<CategoryResponse> for Category {
    fn from(raw: CategoryResponse) -> Self {
        Self {
            name: non_blank(raw.name.as_deref()).unwrap_or(&raw.id).to_owned(),
            slug: text(raw.slug),
            description: text(raw.description),
            product_count: raw.product_count,
            is_active: raw.is_active.unwrap_or(true),
            id: raw.id,
        }
    }
}

impl Entity for Category {
    type Raw = CategoryResponse;
    const RESOURCE: Resource = Resource::Categories;

    fn reconcile(raw: CategoryResponse, _reconciler: &StatusReconciler) -> Self {
        raw.into()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn search_terms(&self) -> Vec<&str> {
        let mut terms = vec![self.name.as_str()];
        push_term(&mut terms, self.slug.as_ref());
        terms
    }
}

// ── Sales ──────────────────────────────────────────────────────────

impl From<SaleItemResponse> for SaleLine {
    fn from(raw: SaleItemResponse) -> Self {
        let quantity = raw.quantity.unwrap_or(0);
        let total_price = raw
            .total_price
            .or_else(|| raw.unit_price.map(|unit| unit * f64::from(quantity)));
        Self {
            product_title: non_blank(raw.product_title.as_deref())
                .or_else(|| non_blank(raw.product_id.as_deref()))
                .unwrap_or(PLACEHOLDER)
                .to_owned(),
            product_id: raw.product_id,
            quantity,
            unit_price: raw.unit_price,
            total_price,
        }
    }
}

impl Entity for Sale {
    type Raw = SaleResponse;
    const RESOURCE: Resource = Resource::Sales;

    fn reconcile(raw: SaleResponse, reconciler: &StatusReconciler) -> Self {
        let status = reconciler.sale_status(raw.status.as_deref());
        let customer_name = NameSources {
            first_name: raw.customer_first_name.as_deref(),
            last_name: raw.customer_last_name.as_deref(),
            full_name: raw.customer_name.as_deref(),
            id: raw.customer_id.as_deref(),
        }
        .display_name();

        Self {
            status,
            raw_status: raw.status,
            sale_date: parse_datetime(raw.sale_date.as_deref()),
            total_amount: raw.total_amount,
            tax_amount: raw.tax_amount,
            discount_amount: raw.discount_amount,
            customer_id: raw.customer_id,
            customer_name,
            cashier_email: text(raw.cashier_email),
            lines: raw.items.into_iter().map(SaleLine::from).collect(),
            created_at: parse_datetime(raw.created_at.as_deref()),
            id: raw.id,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn search_terms(&self) -> Vec<&str> {
        let mut terms = vec![self.id.as_str(), self.customer_name.as_str()];
        push_term(&mut terms, self.cashier_email.as_ref());
        terms
    }

    fn status(&self) -> Option<&CanonicalStatus> {
        Some(&self.status)
    }

    fn status_table(reconciler: &StatusReconciler) -> Option<&SynonymTable> {
        Some(reconciler.sale_table())
    }
}
