use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::{
    get_snap::{__path_get_snap, get_snap},
    list_snaps::{__path_list_snaps, list_snaps},
    resume_snap::{__path_resume_snap, resume_snap},
};

#[derive(OpenApi)]
#[openapi(paths(list_snaps, get_snap, resume_snap))]
pub struct SnapApiDoc;

pub fn snap_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/snaps", state.args.server.root_path),
            get(list_snaps),
        )
        .route(
            &format!("{}/snaps/{{snap_id}}", state.args.server.root_path),
            get(get_snap),
        )
        .route(
            &format!("{}/snaps/{{snap_id}}/resume", state.args.server.root_path),
            post(resume_snap),
        )
}
