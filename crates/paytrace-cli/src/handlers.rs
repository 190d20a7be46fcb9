//! Command handlers.

use crate::config::CliConfig;
use anyhow::Context;
use console::style;
use paytrace_client::TracedClient;
use paytrace_core::{CallRequest, Params};
use paytrace_http::ReqwestCaller;
use paytrace_trace::OtelTracer;
use tracing::info;

/// Send one traced request and print the response.
pub async fn request(
    config: &CliConfig,
    method: String,
    url: String,
    headers: Vec<String>,
    data: Option<String>,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let params = parse_params(data.as_deref())?;
    let api_key = config.resolve_api_key(api_key, std::env::var("STRIPE_API_KEY").ok());
    let headers = with_authorization(headers, api_key.as_deref());

    let request = CallRequest::new(method.to_uppercase(), url)
        .with_headers(headers)
        .with_params(params);

    let caller = ReqwestCaller::new(config.http.clone())?;
    let client = TracedClient::with_config(
        caller,
        OtelTracer::global("paytrace"),
        config.client.clone(),
    );

    info!(method = %request.method, url = %request.url, "Calling API");
    let response = client.call(&request).await?;

    let status = if response.is_error_status() {
        style(response.status_code).red()
    } else {
        style(response.status_code).green()
    };
    println!("{} {} {}", status, request.method, request.url);
    if let Some(request_id) = response.header("Request-Id") {
        println!("  Request-Id: {}", style(request_id).dim());
    }
    println!("{}", response.body);

    Ok(())
}

/// Print the effective configuration as YAML.
pub fn show_config(config: &CliConfig) -> anyhow::Result<()> {
    let content = serde_yaml::to_string(config)?;
    println!("{}", content);
    Ok(())
}

fn parse_params(data: Option<&str>) -> anyhow::Result<Params> {
    match data {
        Some(json) => serde_json::from_str(json).context("--data must be a JSON object"),
        None => Ok(Params::new()),
    }
}

/// Add a bearer token unless an Authorization header was given.
fn with_authorization(mut headers: Vec<String>, api_key: Option<&str>) -> Vec<String> {
    let has_authorization = headers.iter().any(|line| {
        line.split_once(':')
            .is_some_and(|(name, _)| name.trim().eq_ignore_ascii_case("authorization"))
    });

    if let (Some(key), false) = (api_key, has_authorization) {
        headers.push(format!("Authorization: Bearer {}", key));
    }
    headers
}
