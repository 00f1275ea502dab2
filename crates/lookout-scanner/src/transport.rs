//! HTTP transport seam.
//!
//! Every network call in the pipeline goes through [`HttpTransport`], so the
//! scheduler, pivots and lookups can be driven by a scripted transport in
//! tests and offline replays.

use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use lookout_core::ScanningConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Largest response body read from the wire. Reading stops at the cap and
/// the response is marked [`truncated`](FetchResponse::truncated).
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, lossily decoded as UTF-8
    pub body: String,
    /// Response headers, names lower-cased
    pub headers: HashMap<String, String>,
    /// Whether the body was cut at [`MAX_BODY_BYTES`]
    pub truncated: bool,
}

impl FetchResponse {
    /// Create a response with no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: HashMap::new(),
            truncated: false,
        }
    }

    /// Mark the body as cut short.
    #[must_use]
    pub fn into_truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    /// True for HTTP 200.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| ProbeError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Generic GET used by probes, pivots and lookups.
///
/// Implementations must be thread-safe; one transport is shared by every
/// concurrent probe in a sweep.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetch `url`, giving up after `timeout`.
    ///
    /// Any status code is a successful fetch; only transport-level faults
    /// are errors.
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport sending the given User-Agent and Accept-Language
    /// with every request.
    ///
    /// # Errors
    /// Returns error if a header value is invalid or the HTTP client cannot
    /// be created.
    pub fn new(user_agent: &str, accept_language: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| ProbeError::Client(format!("invalid user agent: {e}")))?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(accept_language)
                .map_err(|e| ProbeError::Client(format!("invalid accept-language: {e}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ProbeError::Client(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Create a transport from the `[scanning]` config section.
    pub fn from_config(config: &ScanningConfig) -> Result<Self> {
        Self::new(&config.user_agent, &config.accept_language)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse> {
        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                ProbeError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                ProbeError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let mut response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let mut body = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            let room = MAX_BODY_BYTES - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        if truncated {
            debug!(url = %url, limit = MAX_BODY_BYTES, "response body truncated");
        }

        Ok(FetchResponse {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
            headers,
            truncated,
        })
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(FetchResponse),
    Fail(String),
    Timeout,
}

/// Transport that replays canned responses keyed by exact URL.
///
/// Unscripted URLs answer 404 with an empty body. Every request is recorded,
/// and the peak number of overlapping requests is tracked so callers can
/// observe the scheduler's concurrency bound.
#[derive(Debug, Default)]
pub struct StaticTransport {
    routes: HashMap<String, Scripted>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StaticTransport {
    /// Create a transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and `body`.
    #[must_use]
    pub fn with_response(mut self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.routes
            .insert(url.into(), Scripted::Respond(FetchResponse::new(status, body)));
        self
    }

    /// Answer `url` with a prepared response.
    #[must_use]
    pub fn with_fetch(mut self, url: impl Into<String>, response: FetchResponse) -> Self {
        self.routes.insert(url.into(), Scripted::Respond(response));
        self
    }

    /// Fail `url` with a transport error.
    #[must_use]
    pub fn with_failure(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.routes.insert(url.into(), Scripted::Fail(message.into()));
        self
    }

    /// Fail `url` with a timeout.
    #[must_use]
    pub fn with_timeout(mut self, url: impl Into<String>) -> Self {
        self.routes.insert(url.into(), Scripted::Timeout);
        self
    }

    /// Hold every request for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URLs requested so far, in request order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("acquire calls lock").clone()
    }

    /// Whether `url` has been requested.
    #[must_use]
    pub fn was_called(&self, url: &str) -> bool {
        self.calls
            .lock()
            .expect("acquire calls lock")
            .iter()
            .any(|c| c == url)
    }

    /// Highest number of requests that were in flight at once.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for StaticTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse> {
        self.calls
            .lock()
            .expect("acquire calls lock")
            .push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.routes.get(url) {
            Some(Scripted::Respond(response)) => Ok(response.clone()),
            Some(Scripted::Fail(message)) => Err(ProbeError::Transport {
                url: url.to_string(),
                message: message.clone(),
            }),
            Some(Scripted::Timeout) => Err(ProbeError::Timeout {
                url: url.to_string(),
                timeout,
            }),
            None => Ok(FetchResponse::new(404, "")),
        }
    }
}
