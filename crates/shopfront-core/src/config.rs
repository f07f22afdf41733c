// ── Runtime session configuration ──
//
// Describes how to reach the back office and how to present what comes
// back. The config crate builds one from profiles; the core never reads
// files itself.

use std::collections::BTreeMap;
use std::time::Duration;

use secrecy::SecretString;
use shopfront_api::TransportConfig;
use url::Url;

use crate::error::CoreError;
use crate::reconcile::{Locale, StatusReconciler};

/// Everything needed to open a [`Loader`](crate::Loader) session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// API base URL, e.g. `http://localhost:8080`.
    pub api_url: Url,
    /// Bearer token; `None` for storefront-only access.
    pub token: Option<SecretString>,
    pub timeout: Duration,
    /// Page size used when a request does not name one.
    pub page_size: Option<u32>,
    pub locale: Locale,
    /// Raw reservation status -> canonical name overrides.
    pub reservation_statuses: BTreeMap<String, String>,
    /// Raw sale status -> canonical name overrides.
    pub sale_statuses: BTreeMap<String, String>,
}

impl SessionConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            token: None,
            timeout: Duration::from_secs(30),
            page_size: None,
            locale: Locale::default(),
            reservation_statuses: BTreeMap::new(),
            sale_statuses: BTreeMap::new(),
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        let config = TransportConfig::default().with_timeout(self.timeout);
        match &self.token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }

    /// Built-in synonym tables with this session's overrides applied.
    pub fn reconciler(&self) -> Result<StatusReconciler, CoreError> {
        StatusReconciler::with_overrides(
            &self.reservation_statuses,
            &self.sale_statuses,
            self.locale,
        )
    }
}
