//! Response reconciliation and request lifecycle for shopfront clients.
//!
//! Sits between `shopfront-api` (raw payloads) and UI consumers:
//!
//! - **[`normalize`]**: turns every list shape the back office returns
//!   (page envelope, `{data, meta}` envelope, bare array with or without an
//!   out-of-band total) into one canonical [`Page<T>`], enforcing
//!   `totalPages == ceil(totalItems / pageSize)`.
//!
//! - **[`RequestController`]**: per-slot last-request-wins bookkeeping.
//!   Results of superseded requests come back as [`Outcome::Superseded`]
//!   and are never applied.
//!
//! - **[`StatusReconciler`]**: maps raw status vocabularies onto
//!   [`CanonicalStatus`] through data-driven [`SynonymTable`]s and derives
//!   display names with fixed fallbacks.
//!
//! - **[`Loader`]**: facade wiring the three together over a
//!   [`Transport`](shopfront_api::Transport), producing canonical
//!   [`model`] entities.

pub mod config;
pub mod convert;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod page;
pub mod reconcile;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SessionConfig;
pub use error::CoreError;
pub use filter::ListFilter;
pub use lifecycle::{Completion, Outcome, RequestController, RequestToken};
pub use loader::{Loader, ReservationAction, detail_slot};
pub use normalize::{PageFields, RawCount, RawListResponse, normalize, normalize_json};
pub use page::{Page, PageRequest, total_pages_for};
pub use reconcile::{
    CanonicalStatus, Locale, NameSources, StatusKind, StatusReconciler, SynonymTable,
    canonicalize, label,
};

pub use model::{Category, Customer, Entity, Product, Reservation, Sale, SaleLine};

// Transport types consumers need alongside the core.
pub use shopfront_api::{ListParams, RawListPayload, Resource};
