// ── Reservation domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reconcile::{CanonicalStatus, Locale, StatusKind, with_document};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    /// Human-facing reservation code; falls back to the id.
    pub code: String,
    pub status: CanonicalStatus,
    /// The status string as the backend sent it.
    pub raw_status: Option<String>,

    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<u32>,
    pub total_amount: Option<f64>,

    pub customer_id: Option<String>,
    pub customer_first_name: Option<String>,
    pub customer_last_name: Option<String>,
    /// Derived display name, never empty.
    pub customer_name: String,
    /// National identity document.
    pub customer_document: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,

    pub reserved_at: Option<DateTime<Utc>>,
    pub desired_pickup_date: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Reservation {
    /// `"Ana Pérez (30111222)"`.
    pub fn customer_label(&self) -> String {
        with_document(&self.customer_name, self.customer_document.as_deref())
    }

    pub fn status_label(&self, locale: Locale) -> &str {
        self.status.label(locale)
    }

    pub fn can_accept(&self) -> bool {
        self.status.kind() == StatusKind::Pending
    }

    pub fn can_cancel(&self) -> bool {
        !self.status.kind().is_terminal()
    }
}
