//! HTTP API layer for the pantry message transport service.
//!
//! - **Endpoints**: notification dispatch (`POST /mts`) and the in-app inbox
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: identity resolution
//!
//! Built on Axum 0.8 with a Tower middleware stack.

pub mod auth;
pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use auth::{AuthProvider, ProfileTokenAuth};
pub use endpoints::router;
