//! Common utilities and shared types for pantry-mts.
//!
//! This crate provides foundational components used across all pantry-mts
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **HTML escaping**: [`escape_html`] for rendered message bodies

pub mod config;
pub mod error;
pub mod escape;
pub mod id;

pub use config::{Config, DatabaseConfig, EmailConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use escape::escape_html;
pub use id::IdGenerator;
