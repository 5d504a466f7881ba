use axum::extract::State;
use dachef_core::domain::dish_image::{entities::DishImage, ports::DishImageService};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::{
    dish_image::validators::GenerateDishImageValidator,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GenerateDishImageResponse {
    pub data: DishImage,
}

#[utoipa::path(
    post,
    path = "",
    tag = "dish_image",
    summary = "Generate a dish image",
    description = "Generates a picture of a finished dish, stores it and returns both its public URL and the encoded image.",
    request_body = GenerateDishImageValidator,
    responses(
        (status = 201, body = GenerateDishImageResponse),
        (status = 400, description = "Invalid dish name"),
        (status = 502, description = "Image generation failed")
    ),
)]
pub async fn generate_dish_image(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<GenerateDishImageValidator>,
) -> Result<Response<GenerateDishImageResponse>, ApiError> {
    let image = state
        .service
        .generate_dish_image(payload.dish_name, payload.description)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::Created(GenerateDishImageResponse { data: image }))
}
