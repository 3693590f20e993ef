//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use pantry_core::identity::CurrentUser;
use pantry_core::services::{InboxService, MtsDispatcher};

use crate::auth::AuthProvider;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: MtsDispatcher,
    pub inbox_service: InboxService,
    pub auth: Arc<dyn AuthProvider>,
}

/// Authentication middleware.
///
/// Resolves the bearer token to a [`CurrentUser`] and stashes it in request
/// extensions. Endpoints that require authentication extract it; the rest
/// ignore it.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(Some(user)) = state.auth.authenticate(token).await
    {
        req.extensions_mut().insert::<CurrentUser>(user);
    }

    next.run(req).await
}
