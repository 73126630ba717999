//! Thin request wrapper around the Green API WhatsApp gateway.
//!
//! Every call resolves to a [`GatewayResult`]; transport errors, timeouts and
//! non-2xx responses are folded into [`GatewayResult::Failure`] instead of
//! being returned as `Err`.
//!
//! ```text
//! POST {api_url}/waInstance{id}/sendMessage/{token}   {"chatId": "...", "message": "..."}
//! GET  {api_url}/waInstance{id}/getStateInstance/{token}
//! ```

mod client;
pub mod format;
mod gateway;
#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
mod types;

pub use client::{DEFAULT_API_URL, DEFAULT_TIMEOUT, GreenApiClient, instance_base_url};
pub use format::MenuSection;
pub use gateway::{Gateway, SharedGateway};
pub use types::{GatewayError, GatewayKind, GatewayResult};
