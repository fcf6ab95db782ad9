//! Interceptor-pipeline HTTP client for Ricochet
//!
//! Wraps a single-shot transport call in ordered request/response transform
//! chains: registered request interceptors rewrite the outgoing URL and
//! config, the transport fires exactly once, the body is decoded per the
//! client settings, then response interceptors rework the decoded data.
//!
//! ## Features
//!
//! - **Sequential chains**: strict left-to-right fold, each interceptor sees
//!   the cumulative effect of all earlier ones
//! - **Idempotent registration**: adding the same interceptor twice chains it
//!   once; `clear()` resets a chain between setups
//! - **Merging config**: per-call config shallow-merges over a caller-set
//!   default; settings merge field-wise with per-call overrides
//! - **Trait-based transport**: mockable via `Transport`, reqwest by default
//! - **Testing support**: easy stubbing, wiremock-friendly

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod transport;

pub use client::{FinalResponse, HttpClient};
pub use config::{RequestConfig, ResponseKind, Settings, SettingsPatch};
pub use error::{HttpError, Result};
pub use interceptor::{
    InterceptorChain, Interceptors, RequestFn, RequestInterceptor, RequestParams, ResponseFn,
    ResponseInterceptor,
};
pub use transport::{Body, ReqwestTransport, Transport, TransportResponse};

/// Re-export commonly used types
pub use reqwest::{header, Method, StatusCode};
