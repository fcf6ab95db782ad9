//! Interceptor contracts, registration, and the sequential chain runners

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use tracing::debug;

use crate::config::RequestConfig;
use crate::error::Result;
use crate::transport::{Body, TransportResponse};

/// The unit threaded through the request pipeline: the outgoing URL plus the
/// merged transport config.
#[derive(Debug, Clone)]
pub struct RequestParams {
    pub url: String,
    pub config: RequestConfig,
}

/// A transform applied to an outgoing request before it is sent.
///
/// Each interceptor receives the cumulative output of all earlier ones and
/// returns the params the next one (or the transport) will see. Returning an
/// error aborts the whole call; already-run interceptors are not rolled back.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn intercept(&self, url: String, config: RequestConfig) -> Result<RequestParams>;
}

/// A transform applied to the decoded response body after the transport call.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    async fn intercept(
        &self,
        data: Body,
        response: &TransportResponse,
        config: &RequestConfig,
    ) -> Result<Body>;
}

/// Adapter turning an async closure into a [`RequestInterceptor`].
///
/// ```ignore
/// use futures::FutureExt;
/// let rewrite = RequestFn(|url: String, config| {
///     async move { Ok(RequestParams { url: url.replace("/products", "/posts"), config }) }
///         .boxed()
/// });
/// ```
pub struct RequestFn<F>(pub F);

#[async_trait]
impl<F> RequestInterceptor for RequestFn<F>
where
    F: Fn(String, RequestConfig) -> BoxFuture<'static, Result<RequestParams>> + Send + Sync,
{
    async fn intercept(&self, url: String, config: RequestConfig) -> Result<RequestParams> {
        (self.0)(url, config).await
    }
}

/// Adapter turning an async function into a [`ResponseInterceptor`].
pub struct ResponseFn<F>(pub F);

#[async_trait]
impl<F> ResponseInterceptor for ResponseFn<F>
where
    F: for<'a> Fn(Body, &'a TransportResponse, &'a RequestConfig) -> BoxFuture<'a, Result<Body>>
        + Send
        + Sync,
{
    async fn intercept(
        &self,
        data: Body,
        response: &TransportResponse,
        config: &RequestConfig,
    ) -> Result<Body> {
        (self.0)(data, response, config).await
    }
}

/// An ordered, identity-deduplicated list of interceptors for one direction.
///
/// Registration order is execution order; there is no priority or reordering.
/// Mutation goes through `add`/`clear` only.
pub struct InterceptorChain<T: ?Sized> {
    entries: RwLock<Vec<Arc<T>>>,
}

impl<T: ?Sized> InterceptorChain<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append an interceptor unless the same `Arc` is already registered.
    /// Registration is idempotent so repeated setup calls do not chain the
    /// same transform twice.
    pub fn add(&self, interceptor: Arc<T>) {
        let mut entries = self.entries.write();
        if entries.iter().any(|entry| Arc::ptr_eq(entry, &interceptor)) {
            return;
        }
        entries.push(interceptor);
    }

    /// Snapshot of the current entries in registration order.
    pub fn get(&self) -> Vec<Arc<T>> {
        self.entries.read().clone()
    }

    /// Remove all entries. Call once per logical application instance before
    /// re-registering, so handlers do not accumulate across repeated setups.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// The per-client registry: one chain per direction.
pub struct Interceptors {
    pub request: InterceptorChain<dyn RequestInterceptor>,
    pub response: InterceptorChain<dyn ResponseInterceptor>,
}

impl Interceptors {
    pub(crate) fn new() -> Self {
        Self {
            request: InterceptorChain::new(),
            response: InterceptorChain::new(),
        }
    }
}

/// Run the request chain as a strict left fold: each entry awaits before the
/// next starts and sees the accumulated result of all earlier entries. An
/// empty chain returns the seed unchanged.
pub(crate) async fn run_request_chain(
    entries: &[Arc<dyn RequestInterceptor>],
    url: String,
    config: RequestConfig,
    debug_enabled: bool,
) -> Result<RequestParams> {
    let mut acc = RequestParams { url, config };
    for (index, entry) in entries.iter().enumerate() {
        if debug_enabled {
            debug!(index, "running request interceptor");
        }
        acc = entry.intercept(acc.url, acc.config).await?;
    }
    Ok(acc)
}

/// Response-side counterpart of [`run_request_chain`], folding over the
/// decoded body.
pub(crate) async fn run_response_chain(
    entries: &[Arc<dyn ResponseInterceptor>],
    mut data: Body,
    response: &TransportResponse,
    config: &RequestConfig,
    debug_enabled: bool,
) -> Result<Body> {
    for (index, entry) in entries.iter().enumerate() {
        if debug_enabled {
            debug!(index, "running response interceptor");
        }
        data = entry.intercept(data, response, config).await?;
    }
    Ok(data)
}
