//! Port traits.
//!
//! These traits define the interfaces between the traced client and the
//! collaborators it wraps: the transport that performs the call and the
//! tracer that records it.

use crate::call::{CallRequest, CallResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Performs an outbound API call.
#[async_trait]
pub trait Caller: Send + Sync {
    /// Failure returned when no response could be produced.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Perform the call. HTTP error statuses are successful responses.
    async fn request(&self, request: &CallRequest) -> Result<CallResponse, Self::Error>;
}

#[async_trait]
impl<C> Caller for Arc<C>
where
    C: Caller + ?Sized,
{
    type Error = C::Error;

    async fn request(&self, request: &CallRequest) -> Result<CallResponse, Self::Error> {
        (**self).request(request).await
    }
}

/// Classification of a span relative to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpanKind {
    /// This process initiated an outbound request.
    Client,
    /// This process is handling an inbound request.
    Server,
    Producer,
    Consumer,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Client => "CLIENT",
            SpanKind::Server => "SERVER",
            SpanKind::Producer => "PRODUCER",
            SpanKind::Consumer => "CONSUMER",
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed, tagged record of one traced operation.
///
/// `finish` consumes the span, so a span cannot be finished twice.
pub trait Span: Send + Sized {
    fn set_kind(&mut self, kind: SpanKind);

    fn set_name(&mut self, name: &str);

    fn tag(&mut self, key: &str, value: &str);

    /// Record the start timestamp.
    fn start(&mut self);

    /// Record the finish timestamp and hand the span to the backend.
    fn finish(self);
}

/// Creates spans.
pub trait Tracer: Send + Sync {
    type Span: Span;

    /// Create a new, not yet started span.
    fn next_span(&self) -> Self::Span;
}

impl<T> Tracer for Arc<T>
where
    T: Tracer + ?Sized,
{
    type Span = T::Span;

    fn next_span(&self) -> Self::Span {
        (**self).next_span()
    }
}
