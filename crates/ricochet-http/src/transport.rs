//! Transport abstraction and the default reqwest-backed implementation

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode};

use crate::config::RequestConfig;
use crate::error::{HttpError, Result};

/// A decoded response body, threaded through the response pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Blob(Vec<u8>),
    Text(String),
}

impl Body {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Body::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Fetch-like transport capability: one network call per invocation.
///
/// The client owns everything around this seam (merging, interceptors,
/// decoding); implementations only turn a URL and config into a buffered
/// response. Stub implementations stand in for the network in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str, config: &RequestConfig) -> Result<TransportResponse>;
}

/// A fully buffered transport response: status, headers, and raw body bytes,
/// with decode methods for each [`crate::ResponseKind`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self { status, headers, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether the `content-type` header indicates a JSON body.
    pub fn is_json(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("application/json"))
            .unwrap_or(false)
    }

    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn blob(&self) -> Vec<u8> {
        self.body.clone()
    }
}

/// Default transport backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let inner = reqwest::Client::builder()
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, url: &str, config: &RequestConfig) -> Result<TransportResponse> {
        let url = url
            .parse::<url::Url>()
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let method = config.method.clone().unwrap_or(Method::GET);
        let mut request = self.inner.request(method, url);

        if let Some(headers) = &config.headers {
            request = request.headers(headers.clone());
        }
        if let Some(body) = &config.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse::new(status, headers, body))
    }
}
