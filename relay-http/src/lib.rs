//! Minimal outbound HTTP client with safe logging and bearer auth.
//!
//! - Request options: headers, `Auth`, query params, timeout
//! - JSON (`get_json`, `post_json_opts`) and text (`get_text`) responses
//! - Redacts bearer tokens, sensitive query params and, on request, the URL path
//!   (the Telegram Bot API puts the token there)
//! - One attempt per call; a 429/5xx surfaces as `HttpError::Api`
//! - Optional *raw* request/response logging via `RELAY_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), relay_http::HttpError> {
//! let client = relay_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", relay_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub use reqwest::StatusCode as HttpStatus;

const RAW_ENV: &str = "RELAY_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;
const REDACTED: &str = "<redacted>";

const SECRET_QUERY_KEYS: &[&str] = &[
    "access_token",
    "authorization",
    "auth",
    "key",
    "api_key",
    "token",
    "secret",
    "client_secret",
    "bearer",
];

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Authentication strategies supported by the client.
///
/// ```
/// use relay_http::Auth;
///
/// let bearer = Auth::Bearer("token");
/// assert_eq!(bearer.kind(), "bearer");
/// assert_eq!(Auth::None.kind(), "none");
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    None,
}

impl Auth<'_> {
    /// Label used in logs in place of the secret.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bearer(_) => "bearer",
            Self::None => "none",
        }
    }
}

/// Per-request tuning knobs.
///
/// ```
/// use relay_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     redact_path: true,
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
    /// Keep the URL path out of every log line.
    pub redact_path: bool,
}

/// Successful response body plus what we logged about it.
struct Fetched {
    req_id: String,
    bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use relay_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET JSON with per-request options.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let fetched = self.execute::<()>(Method::GET, path, None, opts).await?;
        decode_json(fetched)
    }

    /// POST JSON with per-request options.
    pub async fn post_json_opts<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let fetched = self.execute(Method::POST, path, Some(body), opts).await?;
        decode_json(fetched)
    }

    /// GET a text body (HTML pages and the like). Invalid UTF-8 is replaced lossily.
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let fetched = self.execute::<()>(Method::GET, path, None, opts).await?;
        Ok(String::from_utf8_lossy(&fetched.bytes).into_owned())
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<Fetched, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resolve(path, opts.allow_absolute)?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let body_bytes = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| HttpError::Build(format!("body serialization failed: {e}")))?;

        let host_path = if opts.redact_path {
            format!("{}/{REDACTED}", url.host_str().unwrap_or("-"))
        } else {
            format!("{}{}", url.host_str().unwrap_or("-"), url.path())
        };
        let redacted_q = redact_pairs(opts.query.as_deref().unwrap_or_default());
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");

        let mut rb = self.inner.request(method.clone(), url.clone()).timeout(timeout);
        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }
        if let Some(bytes) = &body_bytes {
            rb = rb
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes.clone());
        }
        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }
        if let Some(Auth::Bearer(tok)) = &opts.auth {
            rb = rb.bearer_auth(sanitize_api_key(tok)?);
        }

        let req_id = next_request_id();
        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%host_path,
            query=?redacted_q,
            timeout_ms=timeout.as_millis() as u64,
            auth_kind,
            has_body=%body_bytes.is_some(),
            "http.request.start"
        );

        if raw_enabled() && !opts.redact_path {
            let curl = make_curl(
                &method,
                &url,
                opts.headers.as_ref(),
                body_bytes.as_deref(),
            );
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        let t0 = std::time::Instant::now();
        let sent = match rb.send().await {
            Ok(resp) => {
                let status = resp.status();
                let headers = resp.headers().clone();
                resp.bytes().await.map(|b| (status, headers, b.to_vec()))
            }
            Err(err) => Err(err),
        };

        let (status, headers, bytes) = match sent {
            Ok(parts) => parts,
            Err(err) => {
                let err = if opts.redact_path { err.without_url() } else { err };
                let timed_out = err.is_timeout();
                let message = err.to_string();
                tracing::warn!(
                    req_id=%req_id,
                    timed_out,
                    message=%message,
                    "http.network_error"
                );
                return Err(if timed_out {
                    HttpError::Timeout(timeout)
                } else {
                    HttpError::Network(message)
                });
            }
        };
        let dur_ms = t0.elapsed().as_millis() as u64;

        let upstream_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            x_request_id=%upstream_id,
            "http.response.headers"
        );

        if raw_enabled() {
            let end = bytes.len().min(RAW_MAX_BODY);
            tracing::info!(
                target: "http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?redact_headers(&headers),
                body=%String::from_utf8_lossy(&bytes[..end]),
                truncated=bytes.len() > RAW_MAX_BODY
            );
        }

        if status.is_success() {
            return Ok(Fetched { req_id, bytes });
        }

        let snippet = snip_body(&bytes);
        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            x_request_id=%upstream_id,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id: upstream_id,
        })
    }
}

fn decode_json<T: DeserializeOwned>(fetched: Fetched) -> Result<T, HttpError> {
    serde_json::from_slice::<T>(&fetched.bytes).map_err(|e| {
        let snippet = snip_body(&fetched.bytes);
        tracing::warn!(
            req_id=%fetched.req_id,
            serde_line=%e.line(),
            serde_col=%e.column(),
            serde_err=%e,
            body_snippet=%snippet,
            "http.response.decode_error"
        );
        HttpError::Decode(e.to_string(), snippet)
    })
}

fn next_request_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("r{:x}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

fn is_secret_key(key: &str) -> bool {
    SECRET_QUERY_KEYS.contains(&key.to_ascii_lowercase().as_str())
}

fn redact_pairs(pairs: &[(&str, Cow<'_, str>)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| {
            let shown = if is_secret_key(k) {
                REDACTED.to_string()
            } else {
                v.to_string()
            };
            ((*k).to_string(), shown)
        })
        .collect()
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let val = if *k == reqwest::header::AUTHORIZATION {
                format!("Bearer {REDACTED}")
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (k.as_str().to_string(), val)
        })
        .collect()
}

/// Best-effort curl line for repro; the query string is dropped entirely.
fn make_curl(method: &Method, url: &Url, headers: Option<&HeaderMap>, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{method}")];
    for (name, val) in headers.map(redact_headers).unwrap_or_default() {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    if let Some(bytes) = body {
        let end = bytes.len().min(RAW_MAX_BODY);
        let text = String::from_utf8_lossy(&bytes[..end]);
        parts.push(format!("-d '{}'", text.replace('\'', r"'\''")));
    }
    let mut shown = url.clone();
    shown.set_query(None);
    parts.push(format!("'{}'", shown.as_str()));
    parts.join(" ")
}

/// Pull a human-readable message out of common error envelopes.
fn extract_error_message(body: &[u8]) -> String {
    // {"error":{"message":"..."}}
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        message: String,
    }

    // {"message":"..."} / {"detail":"..."} / {"description":"..."} / {"error":"..."}
    #[derive(Deserialize)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<Nested>(body) {
        return env.error.message;
    }
    if let Ok(m) = serde_json::from_slice::<Flat>(body) {
        for candidate in [m.message, m.detail, m.description, m.error] {
            if !candidate.is_empty() {
                return candidate;
            }
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).into_owned();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "API key contains control characters".into(),
        ));
    }

    HeaderValue::from_str(&format!("Bearer {s}"))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}
