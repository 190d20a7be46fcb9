//! Tracer implementations for paytrace.
//!
//! Provides an in-memory tracer for tests and local inspection, an adapter
//! onto OpenTelemetry tracers, and subscriber/exporter initialisation with
//! OTLP export.

pub mod memory;
pub mod otel;
pub mod tracer;

pub use memory::{InMemoryReporter, InMemorySpan, InMemoryTracer, RecordedSpan};
pub use otel::{OtelSpan, OtelTracer};
pub use tracer::{OtlpConfig, TracerError, TracingConfig, init_tracer, shutdown_tracer};
