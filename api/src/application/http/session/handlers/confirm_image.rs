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
    path = "/{session_id}/confirm",
    tag = "session",
    summary = "Confirm the photo",
    description = "Confirms the uploaded photo and detects the food items in it. An empty item list is a valid result.",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    responses(
        (status = 200, body = SessionResponse),
        (status = 409, description = "No photo waiting for confirmation")
    ),
)]
pub async fn confirm_image(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<SessionResponse>, ApiError> {
    let session = state
        .service
        .confirm_image(session_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(SessionResponse::from(session)))
}
