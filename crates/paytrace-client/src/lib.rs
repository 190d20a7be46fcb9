//! Tracing decorator for payment API clients.
//!
//! [`TracedClient`] wraps any [`Caller`](paytrace_core::Caller) and records one
//! client span per outbound call through any [`Tracer`](paytrace_core::Tracer).
//! Responses and errors pass through unchanged.

pub mod client;
pub mod config;
mod guard;

pub use client::TracedClient;
pub use config::{HeaderTag, TracedClientConfig};
