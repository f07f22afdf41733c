// Async HTTP client for the shopfront back-office API.
//
// Base path: /api/v1/
// Auth: optional bearer token (storefront endpoints are public)

use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::query::ListParams;
use crate::resource::Resource;
use crate::transport::{Transport, TransportConfig};
use crate::types::RawListPayload;

/// Header carrying the out-of-band total on bare-array list responses.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the back-office REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Configured request timeout, reported back in `Error::Timeout`.
    timeout: Option<Duration>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::from_reqwest(base_url, http)?;
        client.timeout = Some(transport.timeout);
        Ok(client)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let mut url = Url::parse(base_url)?;
        // A trailing slash makes `join` append instead of replacing the last segment.
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(Self {
            http,
            base_url: url,
            timeout: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn send_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(err),
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(|e| self.send_error(e))?;
        let (_, body) = self.handle_response(resp).await?;
        Ok(body)
    }

    async fn get_with_headers<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<(HeaderMap, T), Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let (_, body) = self.handle_response(resp).await?;
        Ok(body)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<(HeaderMap, T), Error> {
        let status = resp.status();
        if status.is_success() {
            let headers = resp.headers().clone();
            let body = resp.text().await?;
            let parsed = serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })?;
            Ok((headers, parsed))
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Unauthorized;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err
                    .message
                    .or(err.error)
                    .unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Lists ────────────────────────────────────────────────────────

    /// Fetch a list endpoint without interpreting its shape.
    ///
    /// The body may be a page envelope, a `{data, meta}` envelope or a bare
    /// array; a numeric `X-Total-Count` header is returned alongside it.
    pub async fn list(
        &self,
        resource: Resource,
        params: &ListParams,
    ) -> Result<RawListPayload, Error> {
        debug!(%resource, public = resource.is_public(), "listing");
        let (headers, body): (HeaderMap, Value) = self
            .get_with_headers(resource.path(), &params.to_query())
            .await?;
        Ok(RawListPayload {
            body,
            total_count: total_count_from(&headers),
        })
    }

    /// Fetch a single record as raw JSON.
    pub async fn get_raw(&self, resource: Resource, id: &str) -> Result<Value, Error> {
        self.get(&resource.item_path(id)).await
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// `POST {resource}/{id}/{action}`: returns the updated record as raw JSON.
    pub async fn action<B: Serialize + Sync>(
        &self,
        resource: Resource,
        id: &str,
        action: &str,
        body: &B,
    ) -> Result<Value, Error> {
        let path = format!("{}/{action}", resource.item_path(id));
        self.post(&path, body).await
    }
}

/// Parse the out-of-band total; anything non-numeric counts as absent.
fn total_count_from(headers: &HeaderMap) -> Option<i64> {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
}

// ── Transport seam ───────────────────────────────────────────────────

impl Transport for ApiClient {
    async fn fetch_list(
        &self,
        resource: Resource,
        params: &ListParams,
        cancel: &CancellationToken,
    ) -> Result<RawListPayload, Error> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = self.list(resource, params) => result,
        }
    }

    async fn fetch_one(
        &self,
        resource: Resource,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, Error> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = self.get_raw(resource, id) => result,
        }
    }

    async fn perform(
        &self,
        resource: Resource,
        id: &str,
        action: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<Value, Error> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = self.action(resource, id, action, body) => result,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ApiClient::from_reqwest("http://shop.local/backend", reqwest::Client::new())
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://shop.local/backend/");
        assert_eq!(
            client.url("api/v1/products").unwrap().as_str(),
            "http://shop.local/backend/api/v1/products"
        );
    }

    #[test]
    fn total_count_header_must_be_numeric() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from_static(" 50 "));
        assert_eq!(total_count_from(&headers), Some(50));

        headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from_static("many"));
        assert_eq!(total_count_from(&headers), None);

        assert_eq!(total_count_from(&HeaderMap::new()), None);
    }
}
