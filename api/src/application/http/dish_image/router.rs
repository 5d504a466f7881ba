use axum::{Router, routing::post};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::generate_dish_image::{__path_generate_dish_image, generate_dish_image};

#[derive(OpenApi)]
#[openapi(paths(generate_dish_image))]
pub struct DishImageApiDoc;

pub fn dish_image_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/dish-images", state.args.server.root_path),
        post(generate_dish_image),
    )
}
