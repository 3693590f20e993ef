//! In-app inbox endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use pantry_common::AppResult;
use pantry_core::services::inbox::SiteMessageResponse;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState};

/// Create the inbox router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_messages))
        .route("/unread-count", get(unread_count))
        .route("/{id}/read", post(mark_read))
        .route("/read-all", post(mark_all_read))
}

/// Listing parameters.
#[derive(Debug, Deserialize)]
struct ListQuery {
    /// Maximum results (default: 50, max: 100)
    limit: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCountResponse {
    count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadResponse {
    ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkAllReadResponse {
    updated: u64,
}

/// List the authenticated user's messages, newest first.
async fn list_messages(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<SiteMessageResponse>>> {
    let limit = query.limit.map(|l| l.min(100));
    let messages = state.inbox_service.list(&user.user_id, limit).await?;
    Ok(Json(messages))
}

/// Count the authenticated user's unread messages.
async fn unread_count(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UnreadCountResponse>> {
    let count = state.inbox_service.unread_count(&user.user_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// Mark one message as read.
async fn mark_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MarkReadResponse>> {
    info!(user_id = %user.user_id, message_id = %id, "Marking message as read");
    state.inbox_service.mark_read(&user.user_id, &id).await?;
    Ok(Json(MarkReadResponse { ok: true }))
}

/// Mark all of the user's messages as read.
async fn mark_all_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<MarkAllReadResponse>> {
    let updated = state.inbox_service.mark_all_read(&user.user_id).await?;
    info!(user_id = %user.user_id, updated, "Marked all messages as read");
    Ok(Json(MarkAllReadResponse { updated }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_count_serialization() {
        let json = serde_json::to_value(UnreadCountResponse { count: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({ "count": 4 }));
    }

    #[test]
    fn test_mark_all_read_serialization() {
        let json = serde_json::to_value(MarkAllReadResponse { updated: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({ "updated": 2 }));
    }
}
