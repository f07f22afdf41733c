// ── Canonical domain model ──

pub mod catalog;
pub mod customer;
pub mod reservation;
pub mod sale;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shopfront_api::Resource;

use crate::reconcile::{CanonicalStatus, StatusReconciler, SynonymTable};

pub use catalog::{Category, Product};
pub use customer::Customer;
pub use reservation::Reservation;
pub use sale::{Sale, SaleLine};

/// A canonical entity reconciled from one raw wire type.
pub trait Entity: Sized + Serialize + Send + 'static {
    /// The wire DTO this entity is built from.
    type Raw: DeserializeOwned + Send;

    /// Default list/detail endpoint.
    const RESOURCE: Resource;

    /// Build the canonical value. Total: missing data becomes placeholders.
    fn reconcile(raw: Self::Raw, reconciler: &StatusReconciler) -> Self;

    fn id(&self) -> &str;

    /// Text fields matched by client-side search.
    fn search_terms(&self) -> Vec<&str>;

    fn status(&self) -> Option<&CanonicalStatus> {
        None
    }

    /// Synonym table for this entity's status vocabulary, if it has one.
    fn status_table(_reconciler: &StatusReconciler) -> Option<&SynonymTable> {
        None
    }
}
