//! CLI configuration.

use paytrace_client::TracedClientConfig;
use paytrace_core::ConfigError;
use paytrace_http::HttpCallerConfig;
use paytrace_trace::TracingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CLI configuration, read from a YAML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub client: TracedClientConfig,
    pub http: HttpCallerConfig,
    pub tracing: TracingConfig,
    /// Used when neither `--api-key` nor `STRIPE_API_KEY` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl CliConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Ok(serde_yaml::from_str(&content)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// API key from the flag, then the environment, then the file.
    pub fn resolve_api_key(&self, flag: Option<String>, env: Option<String>) -> Option<String> {
        flag.or(env)
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.is_empty())
    }
}
