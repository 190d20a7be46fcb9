//! HTTP transport for paytrace.
//!
//! [`ReqwestCaller`] performs calls with `reqwest`, encoding nested params the
//! way Stripe expects them (`metadata[order]=1`, `expand[0]=customer`).

pub mod caller;
pub mod encode;

pub use caller::{HttpCallerConfig, ReqwestCaller};
pub use encode::{FlatParam, flatten_params, form_body};
