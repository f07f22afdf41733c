// ── Canonical page ──
//
// The single representation every list response is normalized into.

use serde::{Deserialize, Serialize};

/// Page intent supplied by the UI: both fields optional, `page` 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            page_size: None,
        }
    }

    /// Requested page, with 0 treated as "not requested".
    pub(crate) fn page_or_first(self) -> u64 {
        self.page.filter(|p| *p > 0).map_or(1, u64::from)
    }

    pub(crate) fn size(self) -> Option<u64> {
        self.page_size.map(u64::from)
    }
}

/// Number of pages needed for `total_items` at `page_size` items per page.
///
/// Zero items is zero pages. A zero page size with items counts as 1 per page.
pub fn total_pages_for(total_items: u64, page_size: u64) -> u64 {
    if total_items == 0 {
        0
    } else {
        total_items.div_ceil(page_size.max(1))
    }
}

/// Canonical paginated result.
///
/// Invariant: `total_pages == 0` iff `total_items == 0`, otherwise
/// `total_pages == ceil(total_items / page_size)`. Only the normalizer
/// constructs pages from raw data, so the fields stay read-only.
/// Deserializing goes through [`Page::assemble`] as well; a stored
/// `totalPages` is ignored and re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPage<T>")]
pub struct Page<T> {
    items: Vec<T>,
    total_items: u64,
    page: u64,
    page_size: u64,
    total_pages: u64,
}

/// Wire form of a serialized page, before the invariant is re-applied.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
struct RawPage<T> {
    #[serde(default)]
    items: Vec<T>,
    #[serde(default)]
    total_items: u64,
    #[serde(default)]
    page: u64,
    #[serde(default)]
    page_size: u64,
}

impl<T> From<RawPage<T>> for Page<T> {
    fn from(raw: RawPage<T>) -> Self {
        let received = u64::try_from(raw.items.len()).unwrap_or(u64::MAX);
        let total_items = raw.total_items.max(received);
        Self::assemble(raw.items, total_items, raw.page, raw.page_size)
    }
}

impl<T> Page<T> {
    /// Build a page, deriving `total_pages` and coercing a zero page size.
    pub(crate) fn assemble(items: Vec<T>, total_items: u64, page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        let page_size = if total_items > 0 && page_size == 0 {
            1
        } else {
            page_size
        };
        Self {
            items,
            total_items,
            page,
            page_size,
            total_pages: total_pages_for(total_items, page_size),
        }
    }

    /// The empty page for a request: no items, zero totals.
    pub fn empty(requested: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            page: requested.page_or_first(),
            page_size: requested.size().unwrap_or(0),
            total_pages: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Clamp a navigation target into `1..=total_pages` (1 when empty).
    pub fn clamp_page(&self, target: i64) -> u64 {
        if self.total_pages == 0 {
            return 1;
        }
        u64::try_from(target)
            .unwrap_or(1)
            .clamp(1, self.total_pages)
    }

    /// Whether the stored `total_pages` agrees with the invariant.
    pub fn is_consistent(&self) -> bool {
        self.total_pages == total_pages_for(self.total_items, self.page_size)
            && (self.total_items == 0 || self.page_size > 0)
    }

    /// Transform every item, keeping the pagination fields.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_items_is_zero_pages() {
        assert_eq!(total_pages_for(0, 10), 0);
        assert_eq!(total_pages_for(0, 0), 0);
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(total_pages_for(25, 10), 3);
        assert_eq!(total_pages_for(30, 10), 3);
        assert_eq!(total_pages_for(1, 10), 1);
        assert_eq!(total_pages_for(7, 0), 7);
    }

    #[test]
    fn assemble_coerces_zero_page_size() {
        let page = Page::assemble(vec!['a'], 4, 1, 0);
        assert_eq!(page.page_size(), 1);
        assert_eq!(page.total_pages(), 4);
        assert!(page.is_consistent());
    }

    #[test]
    fn empty_page_uses_request() {
        let page: Page<u8> = Page::empty(PageRequest::new(3, 20));
        assert_eq!(page.page(), 3);
        assert_eq!(page.page_size(), 20);
        assert_eq!(page.total_pages(), 0);

        let page: Page<u8> = Page::empty(PageRequest::default());
        assert_eq!(page.page(), 1);
        assert_eq!(page.page_size(), 0);
    }

    #[test]
    fn clamp_page_stays_in_range() {
        let page = Page::assemble(vec![1, 2], 25, 1, 10);
        assert_eq!(page.clamp_page(0), 1);
        assert_eq!(page.clamp_page(-4), 1);
        assert_eq!(page.clamp_page(2), 2);
        assert_eq!(page.clamp_page(9), 3);

        let empty: Page<u8> = Page::empty(PageRequest::default());
        assert_eq!(empty.clamp_page(5), 1);
    }

    #[test]
    fn navigation_flags() {
        let first = Page::assemble(vec![1], 25, 1, 10);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = Page::assemble(vec![1], 25, 3, 10);
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn map_keeps_pagination() {
        let page = Page::assemble(vec![1, 2, 3], 3, 1, 3).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20, 30]);
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn serializes_camel_case() {
        let page = Page::assemble(vec!["x"], 1, 1, 1);
        let json = serde_json::to_value(&page).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({
                "items": ["x"],
                "totalItems": 1,
                "page": 1,
                "pageSize": 1,
                "totalPages": 1
            })
        );
    }

    #[test]
    fn deserializing_rederives_pagination() {
        let page: Page<u8> = serde_json::from_value(serde_json::json!({
            "items": [],
            "totalItems": 5,
            "page": 0,
            "pageSize": 0,
            "totalPages": 0
        }))
        .unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.page_size(), 1);
        assert_eq!(page.total_pages(), 5);
        assert!(page.is_consistent());
    }

    #[test]
    fn deserialized_total_covers_received_items() {
        let page: Page<char> = serde_json::from_value(serde_json::json!({
            "items": ["a", "b", "c"],
            "totalItems": 1,
            "page": 1,
            "pageSize": 2,
            "totalPages": 9
        }))
        .unwrap();
        assert_eq!(page.total_items(), 3);
        assert_eq!(page.total_pages(), 2);
        assert!(page.is_consistent());
    }
}
