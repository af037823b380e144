use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{SessionType, SESSION_MODEL_KEY};

#[derive(Debug, Deserialize)]
pub struct UpdateModelParams {
    pub model: String,
}

/// Stores the visitor's model choice. The name is not validated here; an
/// unrecognized choice resolves to the default at question time.
pub async fn update_model(
    session: SessionType,
    payload: Result<Json<UpdateModelParams>, JsonRejection>,
) -> impl IntoResponse {
    match payload {
        Ok(Json(params)) => {
            debug!(model = %params.model, "Updated session model choice");
            session.set(SESSION_MODEL_KEY, params.model);
            (StatusCode::OK, Json(json!({ "status": "success" })))
        }
        Err(rejection) => {
            debug!(error = %rejection, "Rejected malformed model update");
            (StatusCode::BAD_REQUEST, Json(json!({ "status": "error" })))
        }
    }
}
