//! Traced client decorator.

use crate::config::TracedClientConfig;
use crate::guard::SpanGuard;
use async_trait::async_trait;
use paytrace_core::tags::{ERROR, HTTP_METHOD, HTTP_STATUS_CODE, HTTP_URL};
use paytrace_core::{CallRequest, CallResponse, Caller, Span, SpanKind, Tracer};
use tracing::{debug, warn};

/// Decorates a [`Caller`] with one client span per call.
///
/// The span is started before the inner caller runs and finished exactly
/// once afterwards, whatever the outcome. The inner caller's response or
/// error is returned untouched.
pub struct TracedClient<C, T> {
    inner: C,
    tracer: T,
    config: TracedClientConfig,
}

impl<C, T> TracedClient<C, T>
where
    C: Caller,
    T: Tracer,
{
    /// Wrap `inner` using the default Stripe configuration.
    pub fn new(inner: C, tracer: T) -> Self {
        Self::with_config(inner, tracer, TracedClientConfig::default())
    }

    pub fn with_config(inner: C, tracer: T, config: TracedClientConfig) -> Self {
        Self {
            inner,
            tracer,
            config,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn config(&self) -> &TracedClientConfig {
        &self.config
    }

    /// Perform a traced call.
    pub async fn call(&self, request: &CallRequest) -> Result<CallResponse, C::Error> {
        let mut span = SpanGuard::new(self.start_span(request));

        match self.inner.request(request).await {
            Ok(response) => {
                self.tag_response(&mut span, &response);
                debug!(status = response.status_code, "Traced call completed");
                Ok(response)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(method = %request.method, error = %message, "Traced call failed");
                span.tag(ERROR, &message);
                Err(err)
            }
        }
    }

    fn start_span(&self, request: &CallRequest) -> T::Span {
        let name = self.config.span_name(&request.method);
        debug!(method = %request.method, url = %request.url, span = %name, "Starting traced call");

        let mut span = self.tracer.next_span();
        span.set_kind(SpanKind::Client);
        span.tag(HTTP_METHOD, &request.method);
        span.tag(HTTP_URL, &request.url);
        span.set_name(&name);
        span.start();
        span
    }

    fn tag_response(&self, span: &mut SpanGuard<T::Span>, response: &CallResponse) {
        let status = response.status_code.to_string();
        span.tag(HTTP_STATUS_CODE, &status);
        if response.is_error_status() {
            warn!(status = response.status_code, "Traced call returned error status");
            span.tag(ERROR, &status);
        }

        for header_tag in &self.config.header_tags {
            if let Some(value) = response.header(&header_tag.header) {
                span.tag(&header_tag.tag, value);
            }
        }
    }
}

#[async_trait]
impl<C, T> Caller for TracedClient<C, T>
where
    C: Caller,
    T: Tracer,
{
    type Error = C::Error;

    async fn request(&self, request: &CallRequest) -> Result<CallResponse, Self::Error> {
        self.call(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paytrace_core::CallError;
    use paytrace_trace::{InMemoryReporter, InMemoryTracer};

    struct Fixed(u16);

    #[async_trait]
    impl Caller for Fixed {
        type Error = CallError;

        async fn request(&self, _request: &CallRequest) -> Result<CallResponse, Self::Error> {
            Ok(CallResponse::new("{}", self.0))
        }
    }

    fn traced(status: u16) -> (TracedClient<Fixed, InMemoryTracer>, InMemoryReporter) {
        let reporter = InMemoryReporter::new();
        let client = TracedClient::new(Fixed(status), InMemoryTracer::new(reporter.clone()));
        (client, reporter)
    }

    #[tokio::test]
    async fn test_status_399_is_not_an_error() {
        let (client, reporter) = traced(399);
        client.call(&CallRequest::new("GET", "URL")).await.unwrap();

        let span = &reporter.flush()[0];
        assert_eq!(span.tag(HTTP_STATUS_CODE), Some("399"));
        assert!(!span.has_tag(ERROR));
    }

    #[tokio::test]
    async fn test_status_500_is_an_error() {
        let (client, reporter) = traced(500);
        client.call(&CallRequest::new("POST", "URL")).await.unwrap();

        let span = &reporter.flush()[0];
        assert_eq!(span.tag(ERROR), Some("500"));
        assert_eq!(span.name, "stripe/POST");
    }

    #[tokio::test]
    async fn test_absent_headers_are_not_tagged() {
        let (client, reporter) = traced(200);
        client.call(&CallRequest::new("GET", "URL")).await.unwrap();

        let span = &reporter.flush()[0];
        assert!(!span.has_tag("stripe.request_id"));
        assert!(!span.has_tag("stripe.version"));
        assert!(span.finished_at >= span.started_at.unwrap());
    }

    #[tokio::test]
    async fn test_custom_service_prefix() {
        let reporter = InMemoryReporter::new();
        let config = TracedClientConfig::default().with_service_prefix("payments");
        let client =
            TracedClient::with_config(Fixed(201), InMemoryTracer::new(reporter.clone()), config);

        client.call(&CallRequest::new("DELETE", "URL")).await.unwrap();
        assert_eq!(reporter.flush()[0].name, "payments/DELETE");
    }
}
