use utoipa::OpenApi;

use crate::application::http::{
    dish_image::router::DishImageApiDoc, health::router::HealthApiDoc,
    session::router::SessionApiDoc, snap::router::SnapApiDoc,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DaChef API",
        description = "Turn a photo of your fridge into recipes."
    ),
    nest(
        (path = "/sessions", api = SessionApiDoc),
        (path = "/snaps", api = SnapApiDoc),
        (path = "/dish-images", api = DishImageApiDoc),
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;
