// POST /rewrite: moderate one message.
//
// 200 with `{ "rewrite": null, "is_safe": true }` for safe text,
// 200 with `{ "rewrite": "<explanation>", "is_safe": false }` for toxic text,
// 422 for empty text or an unreadable body, 503 when the classifier is down.
// Internal causes are logged and never included in the response.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error};

use crate::error::ModerationError;
use crate::models::{ModerationRequest, RewriteRequest, RewriteResponse};
use crate::web::{api_error, AppState};

pub async fn rewrite(
    State(state): State<AppState>,
    payload: Result<Json<RewriteRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "Rejected /rewrite body");
            return api_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid request body");
        }
    };

    let request = match ModerationRequest::new(body.text) {
        Ok(r) => r,
        Err(_) => return api_error(StatusCode::UNPROCESSABLE_ENTITY, "text must not be empty"),
    };

    match state.pipeline.moderate(&request).await {
        Ok(result) => Json(RewriteResponse::from(result)).into_response(),
        Err(ModerationError::ClassifierUnavailable(cause)) => {
            error!(%cause, "Toxicity classifier failed");
            api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "toxicity classifier unavailable",
            )
        }
        Err(e) => {
            error!(error = %e, "Moderation failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "moderation failed")
        }
    }
}
