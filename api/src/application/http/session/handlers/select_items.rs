use axum::extract::{Path, State};
use dachef_core::domain::workflow::ports::WorkflowService;
use tracing::warn;
use uuid::Uuid;

use crate::application::http::{
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
    session::{validators::SelectItemsValidator, views::SessionResponse},
};

#[utoipa::path(
    post,
    path = "/{session_id}/selection",
    tag = "session",
    summary = "Select ingredients",
    description = "Searches the web for a recipe using the selected items and returns the raw recipe text. Parsing and saving continue in the background; poll the session to follow them.",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    request_body = SelectItemsValidator,
    responses(
        (status = 202, body = SessionResponse),
        (status = 400, description = "Empty selection or unknown item"),
        (status = 409, description = "Session is not waiting for a selection")
    ),
)]
pub async fn select_items(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<SelectItemsValidator>,
) -> Result<Response<SessionResponse>, ApiError> {
    let session = state
        .service
        .select_items(session_id, payload.labels)
        .await
        .map_err(ApiError::from)?;

    // A reset during the search hands back the session as it is now; there is
    // nothing to parse for it.
    if session.awaits_parse() {
        let service = state.service.clone();
        tokio::spawn(async move {
            if let Err(e) = service.complete_recipe(session_id).await {
                warn!(session_id = %session_id, error = %e, "Recipe completion failed");
            }
        });
    }

    Ok(Response::Accepted(SessionResponse::from(session)))
}
