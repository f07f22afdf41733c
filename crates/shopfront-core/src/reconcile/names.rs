// ── Display names ──
//
// Presentation names with several possible raw sources, resolved in a
// fixed priority order. The result is never empty.

/// Label used wherever no data is available.
pub const PLACEHOLDER: &str = "—";

/// Trimmed, non-empty text or `None`.
pub(crate) fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Candidate sources for a person's display name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameSources<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub id: Option<&'a str>,
}

impl NameSources<'_> {
    /// First/last pair, then the combined name, then the identifier, then
    /// the placeholder.
    pub fn display_name(&self) -> String {
        let pair: Vec<&str> = [self.first_name, self.last_name]
            .into_iter()
            .filter_map(non_blank)
            .collect();
        if !pair.is_empty() {
            return pair.join(" ");
        }
        non_blank(self.full_name)
            .or_else(|| non_blank(self.id))
            .unwrap_or(PLACEHOLDER)
            .to_owned()
    }
}

/// `"Ana Pérez (30111222)"`; the document alone when there is no name.
pub fn with_document(name: &str, document: Option<&str>) -> String {
    match non_blank(document) {
        Some(doc) if name.is_empty() || name == PLACEHOLDER => doc.to_owned(),
        Some(doc) => format!("{name} ({doc})"),
        None if name.is_empty() => PLACEHOLDER.to_owned(),
        None => name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_pair_wins() {
        let sources = NameSources {
            first_name: Some("Ana"),
            last_name: Some("Pérez"),
            full_name: Some("A. Perez"),
            id: Some("c-1"),
        };
        assert_eq!(sources.display_name(), "Ana Pérez");
    }

    #[test]
    fn half_a_pair_still_counts() {
        let sources = NameSources {
            first_name: Some("  "),
            last_name: Some("Pérez"),
            full_name: Some("Ana Pérez"),
            ..NameSources::default()
        };
        assert_eq!(sources.display_name(), "Pérez");
    }

    #[test]
    fn combined_then_id_then_placeholder() {
        let combined = NameSources {
            full_name: Some(" Ana Pérez "),
            id: Some("c-1"),
            ..NameSources::default()
        };
        assert_eq!(combined.display_name(), "Ana Pérez");

        let id_only = NameSources {
            id: Some("c-1"),
            ..NameSources::default()
        };
        assert_eq!(id_only.display_name(), "c-1");

        assert_eq!(NameSources::default().display_name(), PLACEHOLDER);
    }

    #[test]
    fn document_in_parentheses() {
        assert_eq!(with_document("Ana Pérez", Some("30111222")), "Ana Pérez (30111222)");
        assert_eq!(with_document("Ana Pérez", Some(" ")), "Ana Pérez");
        assert_eq!(with_document(PLACEHOLDER, Some("30111222")), "30111222");
        assert_eq!(with_document("", None), PLACEHOLDER);
    }
}
