//! # REST Transport
//!
//! [`Backend`] over the backend's PostgREST endpoint, using reqwest.
//!
//! ```text
//!   Query ──► {url}/rest/v1/{collection}?select=..&col=op.value&order=..
//!             headers: apikey, Authorization: Bearer <anon key>
//!                      Prefer: return=representation   (writes)
//!   2xx   ──► JSON rows (empty body → [])
//!   else  ──► BackendError::Api { status, code, message, details, hint }
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::client::Backend;
use crate::config::BackendSettings;
use crate::error::{BackendError, BackendResult};
use crate::query::{Method, Query};

/// PostgREST error body.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Backend reached over HTTP.
#[derive(Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    rest_url: Url,
}

impl fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestBackend")
            .field("rest_url", &self.rest_url.as_str())
            .finish()
    }
}

impl RestBackend {
    /// Builds the HTTP client with the auth headers baked in.
    pub fn new(settings: &BackendSettings, timeout: Duration) -> BackendResult<Self> {
        let base = settings.url().trim_end_matches('/');
        let rest_url = Url::parse(&format!("{base}/rest/v1/"))?;

        let key = settings.anon_key();
        let mut headers = HeaderMap::new();
        let mut apikey = HeaderValue::from_str(key)
            .map_err(|e| BackendError::InvalidRequest(format!("anon key: {e}")))?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| BackendError::InvalidRequest(format!("anon key: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(RestBackend { http, rest_url })
    }

    /// Full request URL for `query`.
    pub fn endpoint(&self, query: &Query) -> BackendResult<Url> {
        let mut url = self.rest_url.join(&query.collection)?;
        {
            let pairs = query.query_pairs();
            if !pairs.is_empty() {
                let mut qp = url.query_pairs_mut();
                for (k, v) in &pairs {
                    qp.append_pair(k, v);
                }
            }
        }
        Ok(url)
    }

    async fn api_error(response: reqwest::Response) -> BackendError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();

        let message = body
            .message
            .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        BackendError::Api {
            status: status.as_u16(),
            code: body.code,
            message,
            details: body.details,
            hint: body.hint,
        }
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn execute(&self, query: Query) -> BackendResult<Value> {
        let url = self.endpoint(&query)?;
        debug!(
            collection = %query.collection,
            method = %query.method,
            single = query.single,
            "Backend request"
        );

        let request = match query.method {
            Method::Select => self.http.get(url),
            Method::Insert => self.http.post(url),
            Method::Update => self.http.patch(url),
            Method::Delete => self.http.delete(url),
        };
        let request = if query.method.is_write() {
            request.header("Prefer", "return=representation")
        } else {
            request
        };
        let request = match query.body {
            Some(ref body) => request.json(body),
            None => request,
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            let err = Self::api_error(response).await;
            debug!(collection = %query.collection, error = %err, "Backend rejected request");
            return Err(err);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        serde_json::from_str(&text).map_err(|e| BackendError::decode(&query.collection, e))
    }
}
