use axum::extract::State;
use dachef_core::domain::workflow::ports::WorkflowService;

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    session::views::SessionResponse,
};

#[utoipa::path(
    post,
    path = "",
    tag = "session",
    summary = "Start a session",
    description = "Starts a new recipe session waiting for a fridge photo.",
    responses(
        (status = 201, body = SessionResponse)
    ),
)]
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Response<SessionResponse>, ApiError> {
    let session = state
        .service
        .start_session()
        .await
        .map_err(ApiError::from)?;

    Ok(Response::Created(SessionResponse::from(session)))
}
