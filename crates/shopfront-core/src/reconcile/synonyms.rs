// ── Synonym tables ──
//
// Data-driven mapping from raw backend status strings to `StatusKind`.
// Lookups try the exact spelling first, then a lowercase-folded spelling.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::error::CoreError;

use super::status::StatusKind;

const RESERVATION_DEFAULTS: &[(&str, StatusKind)] = &[
    ("PENDING", StatusKind::Pending),
    ("ACCEPTED", StatusKind::Accepted),
    ("CONFIRMED", StatusKind::Confirmed),
    ("READY_FOR_PICKUP", StatusKind::ReadyForPickup),
    ("READY", StatusKind::ReadyForPickup),
    ("PICKED_UP", StatusKind::PickedUp),
    ("CANCELED", StatusKind::Cancelled),
    ("CANCELLED", StatusKind::Cancelled),
];

const SALE_DEFAULTS: &[(&str, StatusKind)] = &[
    ("PENDING", StatusKind::Pending),
    ("CONFIRMED", StatusKind::Confirmed),
    ("COMPLETED", StatusKind::Confirmed),
    ("PAID", StatusKind::Confirmed),
    ("CANCELED", StatusKind::Cancelled),
    ("CANCELLED", StatusKind::Cancelled),
    ("VOIDED", StatusKind::Cancelled),
];

fn fold(raw: &str) -> String {
    raw.to_lowercase()
}

/// Raw status string -> canonical kind, for one entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    exact: HashMap<String, StatusKind>,
    folded: HashMap<String, StatusKind>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in reservation vocabulary.
    pub fn reservations() -> Self {
        RESERVATION_DEFAULTS.iter().copied().collect()
    }

    /// Built-in sale vocabulary.
    pub fn sales() -> Self {
        SALE_DEFAULTS.iter().copied().collect()
    }

    /// Bind the exact spelling `raw` to `kind`. For case-insensitive
    /// lookups the first spelling inserted wins.
    pub fn insert(&mut self, raw: impl Into<String>, kind: StatusKind) {
        let raw = raw.into().trim().to_owned();
        self.folded.entry(fold(&raw)).or_insert(kind);
        self.exact.insert(raw, kind);
    }

    /// Bind `raw` and every spelling of it that differs only by case.
    pub fn rebind(&mut self, raw: &str, kind: StatusKind) {
        let raw = raw.trim();
        let key = fold(raw);
        self.exact.retain(|existing, _| fold(existing) != key);
        self.exact.insert(raw.to_owned(), kind);
        self.folded.insert(key, kind);
    }

    /// Exact match, then case-insensitive match.
    pub fn lookup(&self, raw: &str) -> Option<StatusKind> {
        self.exact
            .get(raw)
            .or_else(|| self.folded.get(&fold(raw)))
            .copied()
    }

    /// Apply `raw -> canonical name` overrides (canonical names in snake case,
    /// e.g. `"picked_up"`).
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Result<Self, CoreError> {
        for (raw, canonical) in overrides {
            let kind = StatusKind::from_str(canonical.trim())
                .ok()
                .filter(|kind| !kind.is_fallback())
                .ok_or_else(|| CoreError::Config {
                    message: format!(
                        "status override {raw:?} maps to unknown canonical status {canonical:?}"
                    ),
                })?;
            if raw.trim().is_empty() {
                return Err(CoreError::Config {
                    message: format!("status override for {canonical:?} has a blank raw value"),
                });
            }
            self.rebind(raw, kind);
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Entries sorted by raw spelling.
    pub fn entries(&self) -> Vec<(&str, StatusKind)> {
        let mut entries: Vec<_> = self
            .exact
            .iter()
            .map(|(raw, kind)| (raw.as_str(), *kind))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<S: Into<String>> FromIterator<(S, StatusKind)> for SynonymTable {
    fn from_iter<I: IntoIterator<Item = (S, StatusKind)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (raw, kind) in iter {
            table.insert(raw, kind);
        }
        table
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn exact_then_case_insensitive() {
        let table = SynonymTable::reservations();
        assert_eq!(table.lookup("PENDING"), Some(StatusKind::Pending));
        assert_eq!(table.lookup("pending"), Some(StatusKind::Pending));
        assert_eq!(table.lookup("Picked_Up"), Some(StatusKind::PickedUp));
        assert_eq!(table.lookup("archived"), None);
    }

    #[test]
    fn both_cancel_spellings() {
        let table = SynonymTable::reservations();
        assert_eq!(table.lookup("CANCELED"), table.lookup("cancelled"));
    }

    #[test]
    fn exact_spelling_beats_folded() {
        let mut table = SynonymTable::new();
        table.insert("Done", StatusKind::PickedUp);
        table.insert("DONE", StatusKind::Cancelled);
        assert_eq!(table.lookup("Done"), Some(StatusKind::PickedUp));
        assert_eq!(table.lookup("DONE"), Some(StatusKind::Cancelled));
        assert_eq!(table.lookup("done"), Some(StatusKind::PickedUp));
    }

    #[test]
    fn override_rebinds_case_variants() {
        let overrides = BTreeMap::from([("confirmed".to_owned(), "picked_up".to_owned())]);
        let table = SynonymTable::reservations().with_overrides(&overrides).unwrap();
        assert_eq!(table.lookup("CONFIRMED"), Some(StatusKind::PickedUp));
        assert_eq!(table.lookup("confirmed"), Some(StatusKind::PickedUp));
        assert_eq!(table.len(), SynonymTable::reservations().len());
    }

    #[test]
    fn override_with_unknown_canonical_is_rejected() {
        let overrides = BTreeMap::from([("ARCHIVED".to_owned(), "archived".to_owned())]);
        let err = SynonymTable::reservations().with_overrides(&overrides).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));

        let fallback = BTreeMap::from([("X".to_owned(), "unknown".to_owned())]);
        assert!(SynonymTable::sales().with_overrides(&fallback).is_err());
    }

    #[test]
    fn entries_are_sorted() {
        let table: SynonymTable = [("b", StatusKind::Accepted), ("a", StatusKind::Pending)]
            .into_iter()
            .collect();
        assert_eq!(
            table.entries(),
            vec![("a", StatusKind::Pending), ("b", StatusKind::Accepted)]
        );
    }
}
