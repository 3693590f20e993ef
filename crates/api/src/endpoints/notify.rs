//! Notification dispatch endpoint.

use axum::{Json, Router, extract::State, routing::post};
use pantry_common::AppResult;
use pantry_core::services::dispatcher::{DispatchOutcome, validate_request};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::AppState;

/// Create the dispatch router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(send_notification))
}

/// Wire response for a dispatched notification.
#[derive(Debug, Serialize)]
struct NotifyResponse {
    ok: bool,
    #[serde(flatten)]
    outcome: DispatchOutcome,
}

/// Dispatch one notification.
///
/// Validation failures come back as `{ok: false, error}` with a 400 status;
/// an accepted request always answers 200 with the per-transport breakdown,
/// even when every count is zero.
async fn send_notification(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<NotifyResponse>> {
    let request = validate_request(&body)?;
    let outcome = state.dispatcher.dispatch(&request).await;
    Ok(Json(NotifyResponse { ok: true, outcome }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pantry_core::types::TransportResult;

    #[test]
    fn test_response_matches_wire_shape() {
        let outcome = DispatchOutcome {
            sent: 3,
            errors: 1,
            transports: std::collections::BTreeMap::from([
                ("email".to_string(), TransportResult { sent: 1, errors: 1 }),
                ("site".to_string(), TransportResult { sent: 2, errors: 0 }),
            ]),
        };

        let json = serde_json::to_value(NotifyResponse { ok: true, outcome }).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["sent"], 3);
        assert_eq!(json["errors"], 1);
        assert_eq!(json["transports"]["email"]["sent"], 1);
        assert_eq!(json["transports"]["site"]["errors"], 0);
    }
}
