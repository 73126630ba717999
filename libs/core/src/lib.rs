//! Conversation core of the lakebot WhatsApp concierge.
//!
//! Inbound webhook payloads are reduced to a handful of fields, filtered,
//! and routed either to the welcome flow (first contact) or to the exact-match
//! command table. Replies go out through a [`lakebot_greenapi::Gateway`].
pub mod catalog;
pub mod commands;
pub mod extract;
pub mod menu;
pub mod processor;
pub mod responder;

pub use catalog::{APOLOGY, NO_TRANSFER, Topic};
pub use commands::{Action, normalize, resolve};
pub use extract::{INCOMING_MESSAGE, WebhookFields};
pub use menu::{MAIN_MENU, MenuItem};
pub use processor::{Discard, ProcessOutcome, WebhookProcessor};
pub use responder::Responder;
