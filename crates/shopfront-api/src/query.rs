// ── List query parameters ──
//
// Page intent plus search/sort/filter values, flattened into query pairs.
// Absent and blank values never reach the wire.

use std::collections::BTreeMap;

/// Query parameters accepted by every list endpoint.
///
/// `page` is 1-based. Extra filters (`categoryId`, `isActive`, date ranges)
/// go into `filters` under their wire names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub status: Option<String>,
    /// Sort expression, e.g. `"name,asc"` or `"price,desc"`.
    pub sort: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(key.into(), value.to_string());
        self
    }

    /// Trimmed search text, `None` when blank.
    pub fn search_text(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    /// Trimmed status filter, `None` when blank.
    pub fn status_text(&self) -> Option<&str> {
        non_blank(self.status.as_deref())
    }

    /// Flatten into `(key, value)` pairs for `reqwest::RequestBuilder::query`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_owned(), page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pageSize".to_owned(), size.to_string()));
        }
        if let Some(search) = self.search_text() {
            pairs.push(("search".to_owned(), search.to_owned()));
        }
        if let Some(status) = self.status_text() {
            pairs.push(("status".to_owned(), status.to_owned()));
        }
        if let Some(sort) = non_blank(self.sort.as_deref()) {
            pairs.push(("sort".to_owned(), sort.to_owned()));
        }
        for (key, value) in &self.filters {
            if !value.trim().is_empty() {
                pairs.push((key.clone(), value.clone()));
            }
        }
        pairs
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
