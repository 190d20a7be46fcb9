//! reqwest-backed inner caller.

use crate::encode::{FlatParam, flatten_params, form_body, text_pairs};
use async_trait::async_trait;
use paytrace_core::{CallError, CallRequest, CallResponse, Caller, Params};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// HTTP transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpCallerConfig {
    /// Total request timeout in seconds.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpCallerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 80,
            connect_timeout_secs: 30,
            user_agent: format!("paytrace/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Performs calls over HTTP. Every status code is returned as a response.
#[derive(Debug, Clone)]
pub struct ReqwestCaller {
    client: Client,
}

impl ReqwestCaller {
    pub fn new(config: HttpCallerConfig) -> Result<Self, CallError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| CallError::invalid_request(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Use an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Caller for ReqwestCaller {
    type Error = CallError;

    async fn request(&self, request: &CallRequest) -> Result<CallResponse, CallError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| CallError::invalid_request(format!("Invalid method: {}", request.method)))?;
        let headers = parse_header_lines(&request.headers)?;
        let has_content_type = headers.contains_key(CONTENT_TYPE);

        let mut builder = self
            .client
            .request(method.clone(), &request.url)
            .headers(headers);

        if method == Method::GET || method == Method::DELETE {
            if !request.params.is_empty() {
                builder = builder.query(&text_pairs(&flatten_params(&request.params)));
            }
        } else if request.has_file {
            builder = builder.multipart(multipart_form(&request.params).await?);
        } else {
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            }
            builder = builder.body(form_body(&request.params));
        }

        debug!(method = %method, url = %request.url, "Sending request");
        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                CallError::invalid_request(e.to_string())
            } else {
                CallError::connection(e.to_string())
            }
        })?;

        let status_code = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| CallError::api(format!("Failed to read response body: {}", e)))?;

        Ok(CallResponse {
            body,
            status_code,
            headers,
        })
    }
}

/// Parse `Name: value` header lines.
fn parse_header_lines(lines: &[String]) -> Result<HeaderMap, CallError> {
    let mut headers = HeaderMap::new();
    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| CallError::invalid_request(format!("Malformed header line: {}", line)))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| CallError::invalid_request(format!("Invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| CallError::invalid_request(format!("Invalid header value for {}", name)))?;
        headers.append(name, value);
    }
    Ok(headers)
}

/// Repeated headers are joined with `", "`.
fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut out: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    out
}

async fn multipart_form(params: &Params) -> Result<Form, CallError> {
    let mut form = Form::new();
    for (key, value) in flatten_params(params) {
        form = match value {
            FlatParam::Text(text) => form.text(key, text),
            FlatParam::File(path) => {
                let bytes = tokio::fs::read(&path).await.map_err(|e| {
                    CallError::invalid_request(format!("Failed to read {}: {}", path.display(), e))
                })?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| key.clone());
                form.part(key, Part::bytes(bytes).file_name(file_name))
            }
        };
    }
    Ok(form)
}
