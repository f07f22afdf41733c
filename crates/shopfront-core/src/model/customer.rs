// ── Customer domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reconcile::with_document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Derived display name, never empty.
    pub display_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// National identity document.
    pub document: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Selector label: display name with the document in parentheses.
    pub fn label(&self) -> String {
        with_document(&self.display_name, self.document.as_deref())
    }
}
