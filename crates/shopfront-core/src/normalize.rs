// ── Page normalization ──
//
// Turns any of the list shapes the back office returns into one canonical
// `Page<T>`: a page envelope (`items` + counts), a `{data, meta}` envelope,
// a bare array with an out-of-band total, or a bare array holding the whole
// collection (sliced client-side).

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::page::{Page, PageRequest};

// ── Wire keys ────────────────────────────────────────────────────────

const TOTAL_ITEMS_KEYS: &[&str] = &["totalItems", "total_items", "totalCount", "total_count", "total"];
const PAGE_KEYS: &[&str] = &["page", "currentPage", "current_page", "pageNumber"];
const PAGE_SIZE_KEYS: &[&str] = &["pageSize", "page_size", "perPage", "per_page", "limit", "size"];
const TOTAL_PAGES_KEYS: &[&str] = &["totalPages", "total_pages", "lastPage", "last_page", "pageCount"];

// ── Raw counts ───────────────────────────────────────────────────────

/// A pagination number as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCount {
    Number(u64),
    /// Present but not a non-negative integer; holds a description of what was found.
    Malformed(String),
}

impl RawCount {
    /// Read a JSON value. `null` is treated as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let count = match value {
            Value::Null => return None,
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Self::Number(u)
                } else {
                    Self::from_float(n.as_f64().unwrap_or(f64::NAN), n)
                }
            }
            Value::String(s) => Self::Malformed(format!("is the string {s:?}, expected a number")),
            Value::Bool(b) => Self::Malformed(format!("is the boolean {b}, expected a number")),
            Value::Array(_) => Self::Malformed("is an array, expected a number".into()),
            Value::Object(_) => Self::Malformed("is an object, expected a number".into()),
        };
        Some(count)
    }

    #[allow(
        clippy::float_cmp,
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn from_float(f: f64, original: &serde_json::Number) -> Self {
        // 2^53: beyond this an f64 no longer holds every integer exactly.
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
        if f.is_finite() && f >= 0.0 && f.trunc() == f && f <= MAX_EXACT {
            Self::Number(f as u64)
        } else {
            Self::Malformed(format!("is {original}, expected a non-negative integer"))
        }
    }

    fn resolve(&self, field: &str) -> Result<u64, CoreError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Malformed(reason) => Err(CoreError::malformed(field, reason.clone())),
        }
    }
}

impl From<u64> for RawCount {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

// ── Pagination fields ────────────────────────────────────────────────

/// Pagination fields found on one level of a payload (top level or `meta`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
    pub total_items: Option<RawCount>,
    pub page: Option<RawCount>,
    pub page_size: Option<RawCount>,
    pub total_pages: Option<RawCount>,
}

impl PageFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_items(mut self, n: u64) -> Self {
        self.total_items = Some(n.into());
        self
    }

    pub fn page(mut self, n: u64) -> Self {
        self.page = Some(n.into());
        self
    }

    pub fn page_size(mut self, n: u64) -> Self {
        self.page_size = Some(n.into());
        self
    }

    pub fn total_pages(mut self, n: u64) -> Self {
        self.total_pages = Some(n.into());
        self
    }

    /// Collect fields from a JSON object, accepting the common key spellings.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let lookup = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| object.get(*k))
                .find_map(RawCount::from_value)
        };
        Self {
            total_items: lookup(TOTAL_ITEMS_KEYS),
            page: lookup(PAGE_KEYS),
            page_size: lookup(PAGE_SIZE_KEYS),
            total_pages: lookup(TOTAL_PAGES_KEYS),
        }
    }

    fn resolve(&self, prefix: &str) -> Result<Reported, CoreError> {
        self.resolve_over(prefix, &Self::default(), prefix)
    }

    /// Per-field fallback: take each field from `self`, else from `fallback`.
    /// A malformed value is named under the prefix of the level it came from.
    fn resolve_over(
        &self,
        prefix: &str,
        fallback: &Self,
        fallback_prefix: &str,
    ) -> Result<Reported, CoreError> {
        let field = |own: &Option<RawCount>,
                     other: &Option<RawCount>,
                     name: &str|
         -> Result<Option<u64>, CoreError> {
            match (own, other) {
                (Some(count), _) => count.resolve(&format!("{prefix}{name}")).map(Some),
                (None, Some(count)) => count.resolve(&format!("{fallback_prefix}{name}")).map(Some),
                (None, None) => Ok(None),
            }
        };
        Ok(Reported {
            total_items: field(&self.total_items, &fallback.total_items, "totalItems")?,
            page: field(&self.page, &fallback.page, "page")?,
            page_size: field(&self.page_size, &fallback.page_size, "pageSize")?,
            total_pages: field(&self.total_pages, &fallback.total_pages, "totalPages")?,
        })
    }
}

/// Validated numbers reported by the server.
#[derive(Debug, Clone, Copy)]
struct Reported {
    total_items: Option<u64>,
    page: Option<u64>,
    page_size: Option<u64>,
    total_pages: Option<u64>,
}

// ── Raw list shapes ──────────────────────────────────────────────────

/// The recognized list-response shapes, discriminated once up front.
///
/// A bare array with an out-of-band total is `Bare` plus the total passed
/// to [`normalize`]; the total travels outside the body.
#[derive(Debug, Clone, PartialEq)]
pub enum RawListResponse<T> {
    /// `{ items: [...], totalItems, page, pageSize, totalPages }`
    Page { items: Vec<T>, fields: PageFields },
    /// `{ data: [...], meta?: {...} }` with counts in `meta` or beside `data`.
    Envelope {
        data: Vec<T>,
        meta: Option<PageFields>,
        fields: PageFields,
    },
    /// A bare array.
    Bare(Vec<T>),
}

impl RawListResponse<Value> {
    /// Classify a decoded JSON body. Never fails: unrecognized shapes become
    /// an empty bare array.
    pub fn from_json(body: Value) -> Self {
        match body {
            Value::Array(items) => Self::Bare(items),
            Value::Object(mut object) => {
                if let Some(Value::Array(items)) = object.remove("items") {
                    let fields = PageFields::from_object(&object);
                    return Self::Page { items, fields };
                }
                match object.remove("data") {
                    Some(Value::Array(data)) => {
                        let meta = object
                            .get("meta")
                            .and_then(Value::as_object)
                            .map(PageFields::from_object);
                        let fields = PageFields::from_object(&object);
                        Self::Envelope { data, meta, fields }
                    }
                    // `{ data: { items: [...] } }` wraps a page envelope.
                    Some(inner @ Value::Object(_)) => Self::from_json(inner),
                    _ => {
                        warn!("unrecognized list payload shape, treating as empty");
                        Self::Bare(Vec::new())
                    }
                }
            }
            other => {
                warn!(kind = json_kind(&other), "list payload is not a collection, treating as empty");
                Self::Bare(Vec::new())
            }
        }
    }

    /// Deserialize every item into `U`.
    ///
    /// An item of the wrong type is a `MalformedResponse` naming its index.
    pub fn decode<U: DeserializeOwned>(self) -> Result<RawListResponse<U>, CoreError> {
        let prefix = match &self {
            Self::Page { .. } => "items",
            Self::Envelope { .. } => "data",
            Self::Bare(_) => "",
        };
        let mut index = 0usize;
        self.try_map_items(|item| {
            let at = index;
            index += 1;
            serde_json::from_value(item)
                .map_err(|e| CoreError::malformed(format!("{prefix}[{at}]"), e.to_string()))
        })
    }
}

impl<T> RawListResponse<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Self::Page { items, .. } => items,
            Self::Envelope { data, .. } => data,
            Self::Bare(items) => items,
        }
    }

    pub fn is_bare(&self) -> bool {
        matches!(self, Self::Bare(_))
    }

    /// Apply a fallible transform to every item, keeping the shape.
    pub fn try_map_items<U, E>(
        self,
        f: impl FnMut(T) -> Result<U, E>,
    ) -> Result<RawListResponse<U>, E> {
        Ok(match self {
            Self::Page { items, fields } => RawListResponse::Page {
                items: items.into_iter().map(f).collect::<Result<_, _>>()?,
                fields,
            },
            Self::Envelope { data, meta, fields } => RawListResponse::Envelope {
                data: data.into_iter().map(f).collect::<Result<_, _>>()?,
                meta,
                fields,
            },
            Self::Bare(items) => {
                RawListResponse::Bare(items.into_iter().map(f).collect::<Result<_, _>>()?)
            }
        })
    }

    pub fn map_items<U>(self, mut f: impl FnMut(T) -> U) -> RawListResponse<U> {
        match self.try_map_items(|item| Ok::<U, std::convert::Infallible>(f(item))) {
            Ok(mapped) => mapped,
            Err(never) => match never {},
        }
    }

    /// Keep only matching items. Only meaningful before client-side slicing.
    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        match self {
            Self::Page { items, .. } | Self::Bare(items) => items.retain(f),
            Self::Envelope { data, .. } => data.retain(f),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Normalization ────────────────────────────────────────────────────

/// Convert a raw list response into a canonical page.
///
/// Server-reported fields win, then the request, then values derived from
/// the invariant. Only a count field that is present but not a non-negative
/// integer is an error.
pub fn normalize<T>(
    raw: RawListResponse<T>,
    requested: PageRequest,
    out_of_band_total: Option<i64>,
) -> Result<Page<T>, CoreError> {
    match raw {
        RawListResponse::Page { items, fields } => {
            let reported = fields.resolve("")?;
            Ok(from_reported(items, reported, requested))
        }
        RawListResponse::Envelope { data, meta, fields } => {
            let reported = match meta {
                Some(meta) => meta.resolve_over("meta.", &fields, "")?,
                None => fields.resolve("")?,
            };
            Ok(from_reported(data, reported, requested))
        }
        RawListResponse::Bare(items) => match out_of_band_total.map(u64::try_from) {
            Some(Ok(total)) => Ok(with_external_total(items, total, requested)),
            Some(Err(_)) => {
                debug!(total = ?out_of_band_total, "ignoring negative out-of-band total");
                Ok(slice_client_side(items, requested))
            }
            None => Ok(slice_client_side(items, requested)),
        },
    }
}

/// Convenience: classify and normalize a JSON body in one step.
pub fn normalize_json(
    body: Value,
    requested: PageRequest,
    out_of_band_total: Option<i64>,
) -> Result<Page<Value>, CoreError> {
    normalize(RawListResponse::from_json(body), requested, out_of_band_total)
}

fn len_u64<T>(items: &[T]) -> u64 {
    u64::try_from(items.len()).unwrap_or(u64::MAX)
}

/// Smallest total consistent with a non-empty page actually received.
fn proven_minimum(page: u64, page_size: u64, received: u64) -> u64 {
    if received == 0 {
        return 0;
    }
    (page - 1).saturating_mul(page_size).saturating_add(received)
}

fn from_reported<T>(items: Vec<T>, reported: Reported, requested: PageRequest) -> Page<T> {
    let received = len_u64(&items);
    let page = reported
        .page
        .or_else(|| requested.page.filter(|p| *p > 0).map(u64::from))
        .unwrap_or(1)
        .max(1);
    let page_size = reported
        .page_size
        .or(requested.size())
        .unwrap_or(received);

    let total_items = match reported.total_items {
        Some(total) => total.max(proven_minimum(page, page_size, received)),
        None => proven_minimum(page, page_size, received),
    };

    let page = Page::assemble(items, total_items, page, page_size);
    if let Some(stated) = reported.total_pages {
        if stated != page.total_pages() {
            debug!(
                stated,
                derived = page.total_pages(),
                "reported totalPages disagrees with totals, using derived value"
            );
        }
    }
    page
}

fn with_external_total<T>(items: Vec<T>, total: u64, requested: PageRequest) -> Page<T> {
    let received = len_u64(&items);
    let page = requested.page_or_first();
    let page_size = requested.size().unwrap_or(received);
    let total_items = total.max(proven_minimum(page, page_size.max(1), received));
    Page::assemble(items, total_items, page, page_size)
}

fn slice_client_side<T>(items: Vec<T>, requested: PageRequest) -> Page<T> {
    let total_items = len_u64(&items);
    if total_items == 0 {
        return Page::empty(requested);
    }
    let page = requested.page_or_first();
    let page_size = requested.size().unwrap_or(total_items).max(1);

    let start = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let take = usize::try_from(page_size).unwrap_or(usize::MAX);
    let window: Vec<T> = items.into_iter().skip(start).take(take).collect();

    Page::assemble(window, total_items, page, page_size)
}
