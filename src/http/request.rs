//! Request identification.
//!
//! # Responsibilities
//! - Give every request a unique ID (UUID v4) as early as possible
//! - Keep a caller-supplied `x-request-id` when it is a valid header value
//! - Echo the ID on the response so callers can correlate logs
//! - Tag the request's tracing span with the ID
//!
//! # Design Decisions
//! - The ID is stored both as a header and as a typed request extension
//! - A reverse flow spans minutes; the ID ties both legs to one request

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::http::{HeaderName, HeaderValue, Request, Response};
use tower::{Layer, Service};
use tracing::Span;
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Identifier attached to a request as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access the request ID on any request type.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }
}

/// Span covering one request. Install as the trace layer's `make_span_with`
/// inside [`RequestIdLayer`] so the ID is already present.
pub fn request_span<B>(req: &Request<B>) -> Span {
    let request_id = req.request_id().map_or("-", |id| id.0.as_str());
    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        uri = %req.uri(),
    )
}

/// Layer that assigns and echoes request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestIdService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let (id, header) = match incoming_id(&req) {
            Some(pair) => pair,
            None => fresh_id(),
        };

        req.headers_mut().insert(X_REQUEST_ID, header.clone());
        req.extensions_mut().insert(RequestId(id));

        let future = self.inner.call(req);
        Box::pin(async move {
            let mut response = future.await?;
            response.headers_mut().insert(X_REQUEST_ID, header);
            Ok(response)
        })
    }
}

fn incoming_id<B>(req: &Request<B>) -> Option<(String, HeaderValue)> {
    let value = req.headers().get(X_REQUEST_ID)?;
    let id = value.to_str().ok().filter(|s| !s.is_empty())?;
    Some((id.to_string(), value.clone()))
}

fn fresh_id() -> (String, HeaderValue) {
    let id = Uuid::new_v4().to_string();
    // A hyphenated UUID is always a valid header value.
    let header = HeaderValue::from_str(&id).unwrap_or_else(|_| HeaderValue::from_static("unknown"));
    (id, header)
}
