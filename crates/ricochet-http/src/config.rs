//! Client settings and per-call request configuration

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How a response body is decoded before it enters the response pipeline.
///
/// `Json` is additionally gated on the response's `content-type` header; a
/// `Json` setting against a non-JSON response falls back to text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    #[default]
    Json,
    Blob,
    Text,
}

/// Client-wide behavioral settings, distinct from per-call request config.
///
/// Unset fields always fall back to the last-merged value; updates go through
/// [`Settings::merged`] with a [`SettingsPatch`], never wholesale replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Response body decoding mode
    #[serde(default)]
    pub response_kind: ResponseKind,

    /// Emit per-call debug logs inside a dedicated span
    #[serde(default)]
    pub debug: bool,

    /// Base URL prefixed to relative request URLs
    #[serde(default)]
    pub base_url: String,

    /// When true, prefix `base_url` to every relative URL. If `base_url` is
    /// empty, the client's ambient origin is used instead.
    #[serde(default)]
    pub prefix_base_url: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            response_kind: ResponseKind::Json,
            debug: false,
            base_url: String::new(),
            prefix_base_url: false,
        }
    }
}

impl Settings {
    /// Apply a patch field-wise: `Some` fields override, `None` fields are
    /// preserved. Pure; the receiver is not mutated.
    pub fn merged(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            response_kind: patch.response_kind.unwrap_or(self.response_kind),
            debug: patch.debug.unwrap_or(self.debug),
            base_url: patch.base_url.clone().unwrap_or_else(|| self.base_url.clone()),
            prefix_base_url: patch.prefix_base_url.unwrap_or(self.prefix_base_url),
        }
    }
}

/// Partial settings: an all-`Option` mirror of [`Settings`] used for both
/// stored-settings updates and per-call overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub response_kind: Option<ResponseKind>,
    pub debug: Option<bool>,
    pub base_url: Option<String>,
    pub prefix_base_url: Option<bool>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response_kind(mut self, kind: ResponseKind) -> Self {
        self.response_kind = Some(kind);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_prefix_base_url(mut self, prefix: bool) -> Self {
        self.prefix_base_url = Some(prefix);
        self
    }
}

/// Per-call transport options, merged shallowly over a caller-set default.
///
/// Merge is field-by-field whole-value replacement: a call that sets
/// `headers` replaces the default header map entirely rather than unioning
/// with it.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub method: Option<Method>,
    pub headers: Option<HeaderMap>,
    pub body: Option<Vec<u8>>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a JSON body and the matching `content-type` header.
    pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(value)?);
        let headers = self.headers.get_or_insert_with(HeaderMap::new);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Shallow merge: fields set on `self` win, unset fields fall back to
    /// `defaults`. The defaults are never mutated by a call.
    pub fn merged_over(self, defaults: &RequestConfig) -> RequestConfig {
        RequestConfig {
            method: self.method.or_else(|| defaults.method.clone()),
            headers: self.headers.or_else(|| defaults.headers.clone()),
            body: self.body.or_else(|| defaults.body.clone()),
        }
    }
}
