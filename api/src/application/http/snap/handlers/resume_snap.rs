use axum::extract::{Path, State};
use dachef_core::domain::workflow::ports::WorkflowService;
use uuid::Uuid;

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    session::views::SessionResponse,
};

#[utoipa::path(
    post,
    path = "/{snap_id}/resume",
    tag = "snap",
    summary = "Resume a saved snap",
    description = "Opens a new session at the parsed recipe stage from a saved snap. No model calls are made.",
    params(
        ("snap_id" = Uuid, Path, description = "Snap ID"),
    ),
    responses(
        (status = 201, body = SessionResponse),
        (status = 404, description = "Snap not found")
    ),
)]
pub async fn resume_snap(
    Path(snap_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<SessionResponse>, ApiError> {
    let session = state
        .service
        .resume_from_snap(snap_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::Created(SessionResponse::from(session)))
}
