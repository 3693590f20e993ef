//! Client-resident durable outbox for notification sends.
//!
//! While online, sends go straight to the MTS dispatch endpoint. Offline
//! sends are queued in a durable local store and replayed on reconnect, with
//! a site-only fallback path and bounded (single-attempt) retry semantics.

pub mod client;
pub mod outbox;
pub mod store;

pub use client::{Connectivity, DispatchAck, DispatchClient, HttpDispatchClient};
pub use outbox::{FlushReport, Outbox, SendStatus, fallback_title};
pub use store::{FileOutboxStore, OutboxEntry, OutboxStore};
