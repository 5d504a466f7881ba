use axum::extract::{Query, State};
use dachef_core::domain::snap::ports::SnapService;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    snap::{validators::ListSnapsQuery, views::SnapView},
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ListSnapsResponse {
    pub data: Vec<SnapView>,
}

#[utoipa::path(
    get,
    path = "",
    tag = "snap",
    summary = "List recent snaps",
    description = "Returns the most recent saved runs, newest first, each with its recipes.",
    params(ListSnapsQuery),
    responses(
        (status = 200, body = ListSnapsResponse)
    ),
)]
pub async fn list_snaps(
    State(state): State<AppState>,
    Query(query): Query<ListSnapsQuery>,
) -> Result<Response<ListSnapsResponse>, ApiError> {
    let snaps = state
        .service
        .list_recent_snaps(query.limit)
        .await
        .map_err(ApiError::from)?;

    let data = snaps
        .into_iter()
        .map(|snap| SnapView {
            public_image_url: state.service.image_url(&snap.snap),
            snap,
        })
        .collect();

    Ok(Response::OK(ListSnapsResponse { data }))
}
