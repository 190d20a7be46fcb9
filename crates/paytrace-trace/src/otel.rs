//! OpenTelemetry tracer adapter.

use opentelemetry::KeyValue;
use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::trace::{self as otel, Span as _, SpanBuilder, Status};
use paytrace_core::tags::ERROR;
use paytrace_core::{Span, SpanKind, Tracer};
use std::sync::Arc;
use tracing::debug;

/// Adapts an OpenTelemetry tracer to the paytrace [`Tracer`] port.
pub struct OtelTracer<T> {
    tracer: Arc<T>,
}

impl<T> OtelTracer<T> {
    pub fn new(tracer: T) -> Self {
        Self {
            tracer: Arc::new(tracer),
        }
    }
}

impl OtelTracer<BoxedTracer> {
    /// Use a tracer from the globally installed provider.
    pub fn global(name: &'static str) -> Self {
        Self::new(global::tracer(name))
    }
}

impl<T> Clone for OtelTracer<T> {
    fn clone(&self) -> Self {
        Self {
            tracer: Arc::clone(&self.tracer),
        }
    }
}

impl<T> Tracer for OtelTracer<T>
where
    T: otel::Tracer + Send + Sync,
    T::Span: Send,
{
    type Span = OtelSpan<T>;

    fn next_span(&self) -> OtelSpan<T> {
        OtelSpan {
            tracer: Arc::clone(&self.tracer),
            builder: Some(SpanBuilder::from_name("")),
            span: None,
            error: None,
        }
    }
}

/// Span backed by an OpenTelemetry span.
///
/// Kind, name and tags accumulate in a [`SpanBuilder`] until `start`, which
/// builds the real span. Kind can't change after that.
pub struct OtelSpan<T: otel::Tracer> {
    tracer: Arc<T>,
    builder: Option<SpanBuilder>,
    span: Option<T::Span>,
    // status description waiting for the span to exist
    error: Option<String>,
}

fn otel_kind(kind: SpanKind) -> otel::SpanKind {
    match kind {
        SpanKind::Client => otel::SpanKind::Client,
        SpanKind::Server => otel::SpanKind::Server,
        SpanKind::Producer => otel::SpanKind::Producer,
        SpanKind::Consumer => otel::SpanKind::Consumer,
    }
}

impl<T> Span for OtelSpan<T>
where
    T: otel::Tracer + Send + Sync,
    T::Span: Send,
{
    fn set_kind(&mut self, kind: SpanKind) {
        match self.builder.as_mut() {
            Some(builder) => builder.span_kind = Some(otel_kind(kind)),
            None => debug!(kind = %kind, "Span kind ignored after start"),
        }
    }

    fn set_name(&mut self, name: &str) {
        if let Some(builder) = self.builder.as_mut() {
            builder.name = name.to_string().into();
        } else if let Some(span) = self.span.as_mut() {
            span.update_name(name.to_string());
        }
    }

    fn tag(&mut self, key: &str, value: &str) {
        let attribute = KeyValue::new(key.to_string(), value.to_string());

        if let Some(builder) = self.builder.as_mut() {
            let attributes = builder.attributes.get_or_insert_with(Vec::new);
            match attributes.iter_mut().find(|kv| kv.key.as_str() == key) {
                Some(existing) => *existing = attribute,
                None => attributes.push(attribute),
            }
            if key == ERROR {
                self.error = Some(value.to_string());
            }
        } else if let Some(span) = self.span.as_mut() {
            span.set_attribute(attribute);
            if key == ERROR {
                span.set_status(Status::error(value.to_string()));
            }
        }
    }

    fn start(&mut self) {
        if let Some(builder) = self.builder.take() {
            let mut span = self.tracer.build(builder);
            if let Some(description) = self.error.take() {
                span.set_status(Status::error(description));
            }
            self.span = Some(span);
        }
    }

    fn finish(mut self) {
        self.start();
        if let Some(mut span) = self.span.take() {
            span.end();
        }
    }
}
