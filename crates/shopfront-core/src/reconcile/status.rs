// ── Canonical status domain ──

use serde::{Deserialize, Serialize};

use super::names::PLACEHOLDER;

/// Closed set of lifecycle states shared by every status-bearing entity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    Pending,
    Accepted,
    Confirmed,
    ReadyForPickup,
    PickedUp,
    Cancelled,
    /// Non-blank raw value with no synonym; labeled from the raw text.
    Unrecognized,
    /// Blank or missing raw value.
    Unknown,
}

impl StatusKind {
    const SELECTABLE: [Self; 6] = [
        Self::Pending,
        Self::Accepted,
        Self::Confirmed,
        Self::ReadyForPickup,
        Self::PickedUp,
        Self::Cancelled,
    ];

    /// Statuses a filter control may offer, in lifecycle order.
    pub fn selectable() -> &'static [Self] {
        &Self::SELECTABLE
    }

    /// `true` for the fallback kinds that carry no lifecycle meaning.
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Unrecognized | Self::Unknown)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::PickedUp | Self::Cancelled)
    }

    /// Fixed label for this kind, `None` for `Unrecognized` (labeled from raw).
    pub fn fixed_label(self, locale: Locale) -> Option<&'static str> {
        let label = match (locale, self) {
            (_, Self::Unrecognized) => return None,
            (_, Self::Unknown) => PLACEHOLDER,
            (Locale::Es, Self::Pending) => "Pendiente",
            (Locale::Es, Self::Accepted) => "Aceptada",
            (Locale::Es, Self::Confirmed) => "Confirmada",
            (Locale::Es, Self::ReadyForPickup) => "Lista para retirar",
            (Locale::Es, Self::PickedUp) => "Retirada",
            (Locale::Es, Self::Cancelled) => "Cancelada",
            (Locale::En, Self::Pending) => "Pending",
            (Locale::En, Self::Accepted) => "Accepted",
            (Locale::En, Self::Confirmed) => "Confirmed",
            (Locale::En, Self::ReadyForPickup) => "Ready for pickup",
            (Locale::En, Self::PickedUp) => "Picked up",
            (Locale::En, Self::Cancelled) => "Cancelled",
        };
        Some(label)
    }
}

/// Display language for labels.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    Es,
    En,
}

/// A derived status: the canonical kind plus, for unrecognized raw values,
/// the title-cased text used as its label.
///
/// Two raw spellings of the same status produce equal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalStatus {
    kind: StatusKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fallback: Option<String>,
}

impl CanonicalStatus {
    pub fn new(kind: StatusKind) -> Self {
        Self {
            kind,
            fallback: None,
        }
    }

    pub fn unknown() -> Self {
        Self::new(StatusKind::Unknown)
    }

    /// An unmatched, non-blank raw value.
    pub(crate) fn unrecognized(raw: &str) -> Self {
        let titled = title_case(raw);
        Self {
            kind: StatusKind::Unrecognized,
            fallback: Some(if titled.is_empty() {
                raw.to_owned()
            } else {
                titled
            }),
        }
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    /// Human-readable label. Never empty.
    pub fn label(&self, locale: Locale) -> &str {
        match self.kind.fixed_label(locale) {
            Some(label) => label,
            None => self
                .fallback
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(PLACEHOLDER),
        }
    }
}

impl From<StatusKind> for CanonicalStatus {
    fn from(kind: StatusKind) -> Self {
        Self::new(kind)
    }
}

/// `"on_hold"` / `"ON-HOLD"` -> `"On Hold"`.
fn title_case(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
