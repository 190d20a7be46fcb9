//! Traced client configuration.

use paytrace_core::ConfigError;
use paytrace_core::tags::{STRIPE_REQUEST_ID, STRIPE_VERSION};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maps a response header onto a span tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderTag {
    /// Response header name, matched case-insensitively.
    pub header: String,
    /// Span tag key the header value is written to.
    pub tag: String,
}

impl HeaderTag {
    pub fn new(header: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            tag: tag.into(),
        }
    }
}

/// Traced client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracedClientConfig {
    /// Identifies the wrapped API in span names (`<prefix>/<method>`).
    #[serde(default = "default_service_prefix")]
    pub service_prefix: String,
    /// Response headers copied onto the span when present.
    #[serde(default = "default_header_tags")]
    pub header_tags: Vec<HeaderTag>,
}

fn default_service_prefix() -> String {
    "stripe".to_string()
}

fn default_header_tags() -> Vec<HeaderTag> {
    vec![
        HeaderTag::new("Request-Id", STRIPE_REQUEST_ID),
        HeaderTag::new("Stripe-Version", STRIPE_VERSION),
    ]
}

impl Default for TracedClientConfig {
    fn default() -> Self {
        Self {
            service_prefix: default_service_prefix(),
            header_tags: default_header_tags(),
        }
    }
}

impl TracedClientConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    pub fn with_service_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.service_prefix = prefix.into();
        self
    }

    /// Add a header to tag mapping.
    pub fn with_header_tag(mut self, header: impl Into<String>, tag: impl Into<String>) -> Self {
        self.header_tags.push(HeaderTag::new(header, tag));
        self
    }

    /// Drop all header to tag mappings, including the defaults.
    pub fn without_header_tags(mut self) -> Self {
        self.header_tags.clear();
        self
    }

    pub fn span_name(&self, method: &str) -> String {
        format!("{}/{}", self.service_prefix, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TracedClientConfig::default();
        assert_eq!(config.service_prefix, "stripe");
        assert_eq!(config.span_name("GET"), "stripe/GET");
        assert_eq!(config.header_tags.len(), 2);
        assert_eq!(config.header_tags[0].tag, "stripe.request_id");
    }

    #[test]
    fn test_builder() {
        let config = TracedClientConfig::default()
            .without_header_tags()
            .with_service_prefix("adyen")
            .with_header_tag("Pspreference", "adyen.psp_reference");

        assert_eq!(config.span_name("POST"), "adyen/POST");
        assert_eq!(
            config.header_tags,
            vec![HeaderTag::new("Pspreference", "adyen.psp_reference")]
        );
    }

    #[test]
    fn test_from_file_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "service_prefix: billing").unwrap();

        let config = TracedClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.service_prefix, "billing");
        assert_eq!(config.header_tags, default_header_tags());
    }

    #[test]
    fn test_from_missing_file() {
        let err = TracedClientConfig::from_file(Path::new("/nonexistent/paytrace.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
