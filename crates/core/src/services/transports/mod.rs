//! Delivery channel adapters.
//!
//! Each adapter attempts delivery to its destinations and reports per-channel
//! counts. Adapters never propagate delivery failures as errors; a failed
//! destination is counted and logged, and the dispatch carries on.

mod email;
mod site;
mod webhook;

pub use email::EmailTransport;
pub use site::SiteTransport;
pub use webhook::WebhookTransport;
