// ── Status reconciliation ──
//
// Raw status vocabularies -> `CanonicalStatus`, and the derived presentation
// fields that sit next to them. Everything here is total: missing or odd
// data degrades to a labeled placeholder.

pub mod names;
pub mod status;
pub mod synonyms;

use std::collections::BTreeMap;

pub use names::{NameSources, PLACEHOLDER, with_document};
pub use status::{CanonicalStatus, Locale, StatusKind};
pub use synonyms::SynonymTable;

use crate::error::CoreError;

/// Derive a canonical status from a raw string. Never fails.
pub fn canonicalize(raw: &str, table: &SynonymTable) -> CanonicalStatus {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CanonicalStatus::unknown();
    }
    match table.lookup(trimmed) {
        Some(kind) => CanonicalStatus::new(kind),
        None => CanonicalStatus::unrecognized(trimmed),
    }
}

/// Human-readable label for `status`. Never empty.
pub fn label(status: &CanonicalStatus, locale: Locale) -> &str {
    status.label(locale)
}

/// Per-entity synonym tables plus the display locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReconciler {
    reservations: SynonymTable,
    sales: SynonymTable,
    locale: Locale,
}

impl Default for StatusReconciler {
    fn default() -> Self {
        Self::new(SynonymTable::reservations(), SynonymTable::sales(), Locale::default())
    }
}

impl StatusReconciler {
    pub fn new(reservations: SynonymTable, sales: SynonymTable, locale: Locale) -> Self {
        Self {
            reservations,
            sales,
            locale,
        }
    }

    /// Built-in tables with configured overrides merged on top.
    pub fn with_overrides(
        reservation_overrides: &BTreeMap<String, String>,
        sale_overrides: &BTreeMap<String, String>,
        locale: Locale,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(
            SynonymTable::reservations().with_overrides(reservation_overrides)?,
            SynonymTable::sales().with_overrides(sale_overrides)?,
            locale,
        ))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn reservation_table(&self) -> &SynonymTable {
        &self.reservations
    }

    pub fn sale_table(&self) -> &SynonymTable {
        &self.sales
    }

    pub fn reservation_status(&self, raw: Option<&str>) -> CanonicalStatus {
        canonicalize(raw.unwrap_or_default(), &self.reservations)
    }

    pub fn sale_status(&self, raw: Option<&str>) -> CanonicalStatus {
        canonicalize(raw.unwrap_or_default(), &self.sales)
    }

    /// Label in the configured locale.
    pub fn label<'a>(&self, status: &'a CanonicalStatus) -> &'a str {
        status.label(self.locale)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn case_variants_reconcile_identically() {
        let table = SynonymTable::reservations();
        let upper = canonicalize("READY_FOR_PICKUP", &table);
        let lower = canonicalize("ready_for_pickup", &table);

        assert_eq!(upper, lower);
        assert_eq!(upper.kind(), StatusKind::ReadyForPickup);
        assert_eq!(label(&upper, Locale::Es), label(&lower, Locale::Es));
        assert_eq!(label(&upper, Locale::Es), "Lista para retirar");
    }

    #[test]
    fn blank_input_is_unknown() {
        let table = SynonymTable::reservations();
        for raw in ["", "   ", "\t\n"] {
            let status = canonicalize(raw, &table);
            assert_eq!(status.kind(), StatusKind::Unknown);
            assert_eq!(label(&status, Locale::Es), "—");
        }
    }

    #[test]
    fn unmatched_value_is_title_cased() {
        let status = canonicalize(" AWAITING_STOCK ", &SynonymTable::reservations());
        assert_eq!(status.kind(), StatusKind::Unrecognized);
        assert_eq!(label(&status, Locale::En), "Awaiting Stock");
    }

    #[test]
    fn labels_are_never_empty() {
        let table = SynonymTable::reservations();
        let inputs = ["", "-", "_-_", "x", "ÉTAT", "PENDING", "🙂", "a b"];
        for raw in inputs {
            let status = canonicalize(raw, &table);
            for locale in [Locale::Es, Locale::En] {
                assert!(!label(&status, locale).is_empty(), "{raw:?}");
            }
        }
    }

    #[test]
    fn default_table_keeps_confirmed_distinct_from_picked_up() {
        let table = SynonymTable::reservations();
        assert_eq!(canonicalize("CONFIRMED", &table).kind(), StatusKind::Confirmed);
        assert_eq!(canonicalize("picked_up", &table).kind(), StatusKind::PickedUp);
    }

    #[test]
    fn reconciler_routes_by_entity() {
        let reconciler = StatusReconciler::default();
        assert_eq!(reconciler.sale_status(Some("COMPLETED")).kind(), StatusKind::Confirmed);
        assert_eq!(
            reconciler.reservation_status(Some("COMPLETED")).kind(),
            StatusKind::Unrecognized
        );
        assert_eq!(reconciler.reservation_status(None).kind(), StatusKind::Unknown);
    }

    #[test]
    fn reconciler_applies_overrides() {
        let overrides = BTreeMap::from([("CONFIRMED".to_owned(), "picked_up".to_owned())]);
        let reconciler =
            StatusReconciler::with_overrides(&overrides, &BTreeMap::new(), Locale::Es).unwrap();
        let status = reconciler.reservation_status(Some("CONFIRMED"));
        assert_eq!(reconciler.label(&status), "Retirada");
    }
}
