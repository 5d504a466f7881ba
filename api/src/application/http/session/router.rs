use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::{
    confirm_image::{__path_confirm_image, confirm_image},
    create_session::{__path_create_session, create_session},
    delete_session::{__path_delete_session, delete_session},
    get_session::{__path_get_session, get_session},
    reset_session::{__path_reset_session, reset_session},
    select_items::{__path_select_items, select_items},
    upload_image::{__path_upload_image, upload_image, MAX_IMAGE_SIZE},
};

#[derive(OpenApi)]
#[openapi(paths(
    create_session,
    get_session,
    delete_session,
    upload_image,
    confirm_image,
    select_items,
    reset_session
))]
pub struct SessionApiDoc;

pub fn session_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/sessions", state.args.server.root_path),
            post(create_session),
        )
        .route(
            &format!("{}/sessions/{{session_id}}", state.args.server.root_path),
            get(get_session),
        )
        .route(
            &format!("{}/sessions/{{session_id}}", state.args.server.root_path),
            delete(delete_session),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/image", state.args.server.root_path),
            post(upload_image),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/confirm", state.args.server.root_path),
            post(confirm_image),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/selection", state.args.server.root_path),
            post(select_items),
        )
        .route(
            &format!("{}/sessions/{{session_id}}/reset", state.args.server.root_path),
            post(reset_session),
        )
        // Leave room for multipart framing around the largest accepted image
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024))
}
