use axum::extract::{Path, State};
use dachef_core::domain::snap::ports::SnapService;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    snap::views::SnapView,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GetSnapResponse {
    pub data: SnapView,
}

#[utoipa::path(
    get,
    path = "/{snap_id}",
    tag = "snap",
    summary = "Get a snap",
    params(
        ("snap_id" = Uuid, Path, description = "Snap ID"),
    ),
    responses(
        (status = 200, body = GetSnapResponse),
        (status = 404, description = "Snap not found")
    ),
)]
pub async fn get_snap(
    Path(snap_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response<GetSnapResponse>, ApiError> {
    let snap = state
        .service
        .get_snap(snap_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(GetSnapResponse {
        data: SnapView {
            public_image_url: state.service.image_url(&snap.snap),
            snap,
        },
    }))
}
