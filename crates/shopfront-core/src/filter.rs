// ── Client-side list filtering ──
//
// Applied to bare full-collection responses before client-side slicing,
// mirroring what the server would do with `search` and `status`.

use shopfront_api::ListParams;

use crate::model::Entity;
use crate::reconcile::{CanonicalStatus, StatusReconciler, canonicalize};

/// Search text and status constraint for one list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Lowercased search needle.
    search: Option<String>,
    status: Option<CanonicalStatus>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match over the entity's search terms.
    /// Blank text clears the constraint.
    pub fn search(mut self, text: &str) -> Self {
        let text = text.trim();
        self.search = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    pub fn status(mut self, status: CanonicalStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Build from list params, canonicalizing the raw status through the
    /// entity's synonym table. Entities without a status ignore it.
    pub fn from_params<E: Entity>(params: &ListParams, reconciler: &StatusReconciler) -> Self {
        let mut filter = Self::new();
        if let Some(text) = params.search_text() {
            filter = filter.search(text);
        }
        if let (Some(raw), Some(table)) = (params.status_text(), E::status_table(reconciler)) {
            filter = filter.status(canonicalize(raw, table));
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.status.is_none()
    }

    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        if let Some(wanted) = &self.status {
            if entity.status() != Some(wanted) {
                return false;
            }
        }
        match &self.search {
            Some(needle) => entity
                .search_terms()
                .iter()
                .any(|term| term.to_lowercase().contains(needle.as_str())),
            None => true,
        }
    }
}
