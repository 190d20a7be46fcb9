//! Subscriber and exporter initialization.

use opentelemetry::trace::TracerProvider;
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, runtime,
    trace::{BatchConfigBuilder, BatchSpanProcessor, RandomIdGenerator, Sampler},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Failed to initialize tracer: {0}")]
    Init(String),
}

/// OTLP gRPC exporter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtlpConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub batch_size: usize,
}

impl Default for OtlpConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4317".to_string(),
            timeout_seconds: 10,
            batch_size: 512,
        }
    }
}

/// Tracing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Export spans. When false only the log subscriber is installed.
    pub enabled: bool,
    pub service_name: String,
    pub service_version: String,
    /// Fraction of traces sampled, clamped to `[0, 1]`.
    pub sample_rate: f64,
    pub otlp: Option<OtlpConfig>,
    pub resource_attributes: HashMap<String, String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: "paytrace".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            sample_rate: 1.0,
            otlp: None,
            resource_attributes: HashMap::new(),
        }
    }
}

impl TracingConfig {
    pub fn sampler(&self) -> Sampler {
        if self.sample_rate >= 1.0 {
            Sampler::AlwaysOn
        } else if self.sample_rate <= 0.0 {
            Sampler::AlwaysOff
        } else {
            Sampler::TraceIdRatioBased(self.sample_rate)
        }
    }
}

/// Initialize logging and, when configured, OTLP span export.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracer(config: &TracingConfig) -> Result<(), TracerError> {
    if !config.enabled {
        return init_basic_tracing();
    }

    match &config.otlp {
        Some(otlp_config) => init_otlp_tracer(config, otlp_config, build_resource(config)),
        None => init_basic_tracing(),
    }
}

fn build_resource(config: &TracingConfig) -> Resource {
    let mut attrs = vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", config.service_version.clone()),
    ];

    for (key, value) in &config.resource_attributes {
        attrs.push(KeyValue::new(key.clone(), value.clone()));
    }

    Resource::new(attrs)
}

fn init_otlp_tracer(
    config: &TracingConfig,
    otlp_config: &OtlpConfig,
    resource: Resource,
) -> Result<(), TracerError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&otlp_config.endpoint)
        .with_timeout(std::time::Duration::from_secs(otlp_config.timeout_seconds))
        .build()
        .map_err(|e| TracerError::Init(e.to_string()))?;

    let batch_config = BatchConfigBuilder::default()
        .with_max_export_batch_size(otlp_config.batch_size)
        .build();
    let processor = BatchSpanProcessor::builder(exporter, runtime::Tokio)
        .with_batch_config(batch_config)
        .build();

    let provider = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_span_processor(processor)
        .with_sampler(config.sampler())
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("paytrace");
    global::set_tracer_provider(provider);

    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer())
        .with(telemetry_layer)
        .try_init()
        .map_err(|e| TracerError::Init(e.to_string()))
}

fn init_basic_tracing() -> Result<(), TracerError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer())
        .try_init()
        .map_err(|e| TracerError::Init(e.to_string()))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn fmt_layer<S>() -> tracing_subscriber::fmt::Layer<S> {
    tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
}

/// Shutdown the tracer provider and flush remaining spans.
pub fn shutdown_tracer() {
    global::shutdown_tracer_provider();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.service_name, "paytrace");
        assert_eq!(config.sample_rate, 1.0);
        assert!(config.otlp.is_none());
    }

    #[test]
    fn test_otlp_config_default() {
        let config = OtlpConfig::default();
        assert_eq!(config.endpoint, "http://localhost:4317");
        assert_eq!(config.batch_size, 512);
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
service_name: checkout
sample_rate: 0.25
otlp:
  endpoint: http://collector:4317
"#;
        let config: TracingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.service_name, "checkout");
        assert!(config.enabled);
        let otlp = config.otlp.unwrap();
        assert_eq!(otlp.endpoint, "http://collector:4317");
        assert_eq!(otlp.timeout_seconds, 10);
    }

    #[test]
    fn test_sampler_bounds() {
        let mut config = TracingConfig::default();
        assert!(matches!(config.sampler(), Sampler::AlwaysOn));

        config.sample_rate = 0.0;
        assert!(matches!(config.sampler(), Sampler::AlwaysOff));

        config.sample_rate = 0.5;
        assert!(matches!(config.sampler(), Sampler::TraceIdRatioBased(r) if r == 0.5));
    }
}
