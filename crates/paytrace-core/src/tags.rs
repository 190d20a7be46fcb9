//! Span tag keys written by the traced client.

/// HTTP method of the outbound call.
pub const HTTP_METHOD: &str = "http.method";

/// Absolute URL of the outbound call.
pub const HTTP_URL: &str = "http.url";

/// Status code of the response, as a decimal string.
pub const HTTP_STATUS_CODE: &str = "http.status_code";

/// Present when the call failed or answered with a 4xx/5xx status.
pub const ERROR: &str = "error";

/// Stripe request identifier, taken from the `Request-Id` response header.
pub const STRIPE_REQUEST_ID: &str = "stripe.request_id";

/// Stripe API version, taken from the `Stripe-Version` response header.
pub const STRIPE_VERSION: &str = "stripe.version";
