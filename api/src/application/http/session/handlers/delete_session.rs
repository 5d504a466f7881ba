use axum::extract::{Path, State};
use dachef_core::domain::workflow::ports::WorkflowService;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DeleteSessionResponse {
    pub message: String,
}

#[utoipa::path(
    delete,
    path = "/{session_id}",
    tag = "session",
    summary = "Discard a session",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    responses(
        (status = 200, body = DeleteSessionResponse),
        (status = 404, description = "Session not found")
    ),
)]
pub async fn delete_session(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<DeleteSessionResponse>, ApiError> {
    state
        .service
        .discard_session(session_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(DeleteSessionResponse {
        message: format!("Session {} discarded", session_id),
    }))
}
