//! Paytrace Core
//!
//! The call model, error types and port traits shared by every paytrace crate.
//! An outbound API call is described by a [`CallRequest`], answered by a
//! [`CallResponse`], performed by a [`Caller`] and observed through a
//! [`Tracer`] that hands out one [`Span`] per call.

pub mod call;
pub mod error;
pub mod ports;
pub mod tags;

pub use call::{CallRequest, CallResponse, ParamValue, Params};
pub use error::{CallError, ConfigError};
pub use ports::{Caller, Span, SpanKind, Tracer};
