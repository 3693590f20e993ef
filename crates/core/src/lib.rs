//! Core message transport logic: recipient resolution, rendering, transport
//! adapters, dispatch orchestration, and the in-app inbox service.

pub mod collaborators;
pub mod identity;
pub mod services;
pub mod types;

pub use collaborators::{DbDirectory, Directory, InboxSink};
pub use identity::{CurrentUser, Identity};
pub use services::*;
