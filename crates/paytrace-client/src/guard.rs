//! Scoped span ownership.

use paytrace_core::Span;

/// Owns a started span and finishes it when dropped.
///
/// Every exit from a traced call (return, error, panic, cancelled future)
/// runs through `Drop`, which is the only place the span is finished.
pub(crate) struct SpanGuard<S: Span> {
    span: Option<S>,
}

impl<S: Span> SpanGuard<S> {
    pub(crate) fn new(span: S) -> Self {
        Self { span: Some(span) }
    }

    pub(crate) fn tag(&mut self, key: &str, value: &str) {
        if let Some(span) = self.span.as_mut() {
            span.tag(key, value);
        }
    }
}

impl<S: Span> Drop for SpanGuard<S> {
    fn drop(&mut self) {
        if let Some(span) = self.span.take() {
            span.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paytrace_core::{SpanKind, Tracer};
    use paytrace_trace::{InMemoryReporter, InMemoryTracer};

    #[test]
    fn test_drop_finishes_once() {
        let reporter = InMemoryReporter::new();
        let tracer = InMemoryTracer::new(reporter.clone());

        let mut span = tracer.next_span();
        span.set_kind(SpanKind::Client);
        span.start();

        {
            let mut guard = SpanGuard::new(span);
            guard.tag("k", "v");
            assert!(reporter.is_empty());
        }

        let spans = reporter.flush();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].tag("k"), Some("v"));
    }
}
