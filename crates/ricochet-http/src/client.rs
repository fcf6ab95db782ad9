//! The interceptor-pipeline HTTP client

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::Method;
use tracing::{debug, debug_span, Instrument, Span};

use crate::config::{RequestConfig, ResponseKind, Settings, SettingsPatch};
use crate::error::Result;
use crate::interceptor::{run_request_chain, run_response_chain, Interceptors, RequestParams};
use crate::transport::{Body, ReqwestTransport, Transport, TransportResponse};

/// Final outcome of a call: the post-pipeline data plus the raw transport
/// response for callers that need status or headers.
#[derive(Debug)]
pub struct FinalResponse {
    pub data: Body,
    pub response: TransportResponse,
}

/// HTTP client with an ordered, mutable interceptor pipeline around a
/// single-shot transport call.
///
/// The client instance is the unit of shared state: default settings, the
/// caller-set default request config, and the two interceptor chains all live
/// here, so separate instances are fully isolated (construct one per test).
/// Per-call setting overrides are merged into a call-local copy and never
/// written back, so one call's debug or decoding mode cannot leak into
/// another's.
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    settings: RwLock<Settings>,
    default_config: RwLock<RequestConfig>,
    interceptors: Interceptors,
    origin: Option<String>,
}

impl HttpClient {
    /// Create a client backed by the default reqwest transport.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(Arc::new(ReqwestTransport::new()?)))
    }

    /// Create a client over a custom transport (stubs, recorders, ...).
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            settings: RwLock::new(Settings::default()),
            default_config: RwLock::new(RequestConfig::default()),
            interceptors: Interceptors::new(),
            origin: None,
        }
    }

    /// Set the ambient origin used to expand relative URLs when no base URL
    /// is configured. Without an origin, relative URLs pass through to the
    /// transport unmodified.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Current settings (cloned).
    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Merge a patch field-wise over the stored settings; unset fields are
    /// preserved.
    pub fn update_settings(&self, patch: SettingsPatch) {
        let mut settings = self.settings.write();
        let merged = settings.merged(&patch);
        *settings = merged;
    }

    /// Current default request config (cloned).
    pub fn config(&self) -> RequestConfig {
        self.default_config.read().clone()
    }

    /// Replace the stored default config wholesale. Unlike settings this is
    /// not a merge: the default config is caller-owned and caller-shaped, and
    /// replacement avoids retaining stale fields from a previous config.
    pub fn set_config(&self, config: RequestConfig) {
        *self.default_config.write() = config;
    }

    /// The request/response interceptor registry.
    pub fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }

    pub async fn get(
        &self,
        url: &str,
        config: RequestConfig,
        settings: Option<SettingsPatch>,
    ) -> Result<FinalResponse> {
        self.execute(url, config.with_method(Method::GET), settings).await
    }

    pub async fn post(
        &self,
        url: &str,
        config: RequestConfig,
        settings: Option<SettingsPatch>,
    ) -> Result<FinalResponse> {
        self.execute(url, config.with_method(Method::POST), settings).await
    }

    pub async fn put(
        &self,
        url: &str,
        config: RequestConfig,
        settings: Option<SettingsPatch>,
    ) -> Result<FinalResponse> {
        self.execute(url, config.with_method(Method::PUT), settings).await
    }

    pub async fn patch(
        &self,
        url: &str,
        config: RequestConfig,
        settings: Option<SettingsPatch>,
    ) -> Result<FinalResponse> {
        self.execute(url, config.with_method(Method::PATCH), settings).await
    }

    pub async fn delete(
        &self,
        url: &str,
        config: RequestConfig,
        settings: Option<SettingsPatch>,
    ) -> Result<FinalResponse> {
        self.execute(url, config.with_method(Method::DELETE), settings).await
    }

    pub async fn head(
        &self,
        url: &str,
        config: RequestConfig,
        settings: Option<SettingsPatch>,
    ) -> Result<FinalResponse> {
        self.execute(url, config.with_method(Method::HEAD), settings).await
    }

    pub async fn options(
        &self,
        url: &str,
        config: RequestConfig,
        settings: Option<SettingsPatch>,
    ) -> Result<FinalResponse> {
        self.execute(url, config.with_method(Method::OPTIONS), settings).await
    }

    /// One full call: merge config and settings, resolve the URL, run the
    /// request chain, hit the transport once, decode, run the response chain.
    async fn execute(
        &self,
        url: &str,
        config: RequestConfig,
        overrides: Option<SettingsPatch>,
    ) -> Result<FinalResponse> {
        // Call config wins field-by-field over the stored default.
        let config = config.merged_over(&self.default_config.read());

        // Per-call overrides merge into a call-local copy; the stored
        // settings are untouched on every path.
        let mut effective = self.settings.read().clone();
        if let Some(patch) = &overrides {
            effective = effective.merged(patch);
        }

        // The span closes when the call future completes, success or failure,
        // so debug scope never leaks across calls.
        let span = if effective.debug {
            debug_span!("http_call", %url)
        } else {
            Span::none()
        };

        self.run(url, config, effective).instrument(span).await
    }

    async fn run(
        &self,
        url: &str,
        config: RequestConfig,
        mut settings: Settings,
    ) -> Result<FinalResponse> {
        let debug_enabled = settings.debug;

        let url = self.resolve_url(url, &mut settings);

        let request_entries = self.interceptors.request.get();
        let RequestParams { url, config } =
            run_request_chain(&request_entries, url, config, debug_enabled).await?;

        let response = self.transport.fetch(&url, &config).await?;

        if debug_enabled {
            debug!(status = %response.status(), "transport response");
            for (name, value) in response.headers() {
                debug!(header = %name, value = ?value, "response header");
            }
        }

        let data = decode_body(&response, settings.response_kind)?;
        if debug_enabled {
            debug!(?data, "decoded body");
        }

        let response_entries = self.interceptors.response.get();
        let data =
            run_response_chain(&response_entries, data, &response, &config, debug_enabled).await?;

        if debug_enabled {
            debug!(%url, ?config, "final request config");
            debug!(?data, "final response data");
        }

        Ok(FinalResponse { data, response })
    }

    /// Expand a relative URL against the configured base, gated on an ambient
    /// origin being present. Absolute URLs and origin-less clients pass
    /// through unchanged.
    fn resolve_url(&self, url: &str, settings: &mut Settings) -> String {
        if !is_relative_url(url) {
            return url.to_string();
        }
        let Some(origin) = &self.origin else {
            return url.to_string();
        };
        if settings.base_url.is_empty() {
            settings.base_url = origin.clone();
        }
        if settings.prefix_base_url && !settings.base_url.is_empty() {
            format!("{}{}", settings.base_url, url)
        } else {
            url.to_string()
        }
    }
}

/// A URL without an http/https/ftp scheme prefix counts as relative.
fn is_relative_url(url: &str) -> bool {
    !(url.starts_with("http://") || url.starts_with("https://") || url.starts_with("ftp://"))
}

/// Three-way decode priority: JSON only when both the setting and the
/// response content-type agree, blob on request, text otherwise.
fn decode_body(response: &TransportResponse, kind: ResponseKind) -> Result<Body> {
    Ok(if kind == ResponseKind::Json && response.is_json() {
        Body::Json(response.json()?)
    } else if kind == ResponseKind::Blob {
        Body::Blob(response.blob())
    } else {
        Body::Text(response.text())
    })
}
