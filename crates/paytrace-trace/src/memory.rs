//! In-memory tracer.
//!
//! Finished spans are collected by an [`InMemoryReporter`] instead of being
//! exported, which makes every tag and timestamp inspectable after a call.

use chrono::{DateTime, Utc};
use paytrace_core::{Span, SpanKind, Tracer};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A finished span as seen by the reporter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedSpan {
    pub kind: Option<SpanKind>,
    pub name: String,
    /// Tags in insertion order. Re-tagging a key overwrites it in place.
    pub tags: Vec<(String, String)>,
    /// `None` when the span was finished without being started.
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: DateTime<Utc>,
}

impl RecordedSpan {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tag(key).is_some()
    }

    /// Zipkin-style JSON view, timestamps in microseconds.
    pub fn to_json(&self) -> serde_json::Value {
        let tags: serde_json::Map<String, serde_json::Value> = self
            .tags
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        let mut json = serde_json::json!({
            "name": self.name,
            "tags": tags,
        });
        if let Some(kind) = self.kind {
            json["kind"] = serde_json::Value::from(kind.as_str());
        }
        if let Some(started_at) = self.started_at {
            json["timestamp"] = serde_json::Value::from(started_at.timestamp_micros());
            let duration = (self.finished_at - started_at).num_microseconds().unwrap_or(0);
            json["duration"] = serde_json::Value::from(duration.max(0));
        }
        json
    }
}

#[derive(Debug, Default)]
struct ReporterState {
    spans: Mutex<Vec<RecordedSpan>>,
    created: AtomicUsize,
}

/// Shared sink for finished spans. Clones report into the same sink.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReporter {
    state: Arc<ReporterState>,
}

impl InMemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, span: RecordedSpan) {
        self.spans().push(span);
    }

    /// Drain and return every span reported so far.
    pub fn flush(&self) -> Vec<RecordedSpan> {
        std::mem::take(&mut *self.spans())
    }

    pub fn len(&self) -> usize {
        self.spans().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of spans handed out by tracers reporting here, finished or not.
    pub fn spans_created(&self) -> usize {
        self.state.created.load(Ordering::SeqCst)
    }

    fn spans(&self) -> MutexGuard<'_, Vec<RecordedSpan>> {
        self.state
            .spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tracer whose spans report to an [`InMemoryReporter`].
#[derive(Debug, Clone)]
pub struct InMemoryTracer {
    reporter: InMemoryReporter,
}

impl InMemoryTracer {
    pub fn new(reporter: InMemoryReporter) -> Self {
        Self { reporter }
    }

    pub fn reporter(&self) -> &InMemoryReporter {
        &self.reporter
    }
}

impl Tracer for InMemoryTracer {
    type Span = InMemorySpan;

    fn next_span(&self) -> InMemorySpan {
        self.reporter.state.created.fetch_add(1, Ordering::SeqCst);
        InMemorySpan {
            reporter: self.reporter.clone(),
            kind: None,
            name: String::new(),
            tags: Vec::new(),
            started_at: None,
        }
    }
}

/// Span under construction.
#[derive(Debug)]
pub struct InMemorySpan {
    reporter: InMemoryReporter,
    kind: Option<SpanKind>,
    name: String,
    tags: Vec<(String, String)>,
    started_at: Option<DateTime<Utc>>,
}

impl Span for InMemorySpan {
    fn set_kind(&mut self, kind: SpanKind) {
        self.kind = Some(kind);
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn tag(&mut self, key: &str, value: &str) {
        match self.tags.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.tags.push((key.to_string(), value.to_string())),
        }
    }

    fn start(&mut self) {
        self.started_at = Some(Utc::now());
    }

    fn finish(self) {
        let recorded = RecordedSpan {
            kind: self.kind,
            name: self.name,
            tags: self.tags,
            started_at: self.started_at,
            finished_at: Utc::now(),
        };
        self.reporter.report(recorded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span_is_reported_on_finish() {
        let reporter = InMemoryReporter::new();
        let tracer = InMemoryTracer::new(reporter.clone());

        let mut span = tracer.next_span();
        span.set_kind(SpanKind::Client);
        span.set_name("stripe/GET");
        span.tag("http.method", "GET");
        span.start();
        assert!(reporter.is_empty());
        assert_eq!(reporter.spans_created(), 1);

        span.finish();
        let spans = reporter.flush();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, Some(SpanKind::Client));
        assert_eq!(spans[0].name, "stripe/GET");
        assert!(spans[0].started_at.is_some());
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_retag_overwrites_in_place() {
        let tracer = InMemoryTracer::new(InMemoryReporter::new());

        let mut span = tracer.next_span();
        span.tag("a", "1");
        span.tag("b", "2");
        span.tag("a", "3");
        span.finish();

        let spans = tracer.reporter().flush();
        assert_eq!(
            spans[0].tags,
            vec![
                ("a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_to_json() {
        let tracer = InMemoryTracer::new(InMemoryReporter::new());

        let mut span = tracer.next_span();
        span.set_kind(SpanKind::Client);
        span.set_name("stripe/POST");
        span.tag("http.status_code", "200");
        span.start();
        span.finish();

        let json = tracer.reporter().flush()[0].to_json();
        assert_eq!(json["kind"], "CLIENT");
        assert_eq!(json["name"], "stripe/POST");
        assert_eq!(json["tags"]["http.status_code"], "200");
        assert!(json["duration"].as_i64().unwrap() >= 0);
    }

    #[test]
    fn test_unstarted_span_has_no_timestamp() {
        let tracer = InMemoryTracer::new(InMemoryReporter::new());
        tracer.next_span().finish();

        let json = tracer.reporter().flush()[0].to_json();
        assert!(json.get("timestamp").is_none());
        assert!(json.get("kind").is_none());
    }
}
