// Shared transport configuration and the transport seam.
//
// `TransportConfig` builds the reqwest client (timeout, user agent, bearer
// token). `Transport` is what the core consumes: raw decoded payloads plus an
// optional out-of-band total, with a cancellation signal the implementation
// may honor.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::query::ListParams;
use crate::resource::Resource;
use crate::types::RawListPayload;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
    /// Bearer token sent as `Authorization: Bearer …` on every request.
    pub token: Option<SecretString>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("shopfront/", env!("CARGO_PKG_VERSION")).to_owned(),
            token: None,
        }
    }
}

impl TransportConfig {
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::InvalidHeader(format!("invalid bearer token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(Error::Transport)
    }
}

/// Source of raw list and record payloads.
///
/// Implementations should abandon the request once `cancel` fires and
/// return [`Error::Cancelled`]; callers must not rely on it, since the
/// request controller discards stale results either way.
pub trait Transport: Send + Sync {
    /// Fetch one page (or the whole collection) of a list endpoint.
    fn fetch_list(
        &self,
        resource: Resource,
        params: &ListParams,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<RawListPayload, Error>> + Send;

    /// Fetch a single record as raw JSON.
    fn fetch_one(
        &self,
        resource: Resource,
        id: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Value, Error>> + Send;

    /// Run a record action (`POST {resource}/{id}/{action}`), returning the updated record.
    fn perform(
        &self,
        resource: Resource,
        id: &str,
        action: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Value, Error>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_user_agent_carries_version() {
        let config = TransportConfig::default();
        assert!(config.user_agent.starts_with("shopfront/"));
        assert!(config.token.is_none());
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let config = TransportConfig::default().with_token(SecretString::from("abc\ndef"));
        let err = config.build_client().unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn valid_token_builds_client() {
        let config = TransportConfig::default()
            .with_token(SecretString::from("eyJhbGciOi.payload.sig"))
            .with_timeout(Duration::from_secs(5));
        assert!(config.build_client().is_ok());
    }
}
