use axum::extract::{Multipart, Path, State};
use bytes::Bytes;
use dachef_core::domain::{
    common::entities::app_errors::CoreError, recipe::entities::ImageAsset,
    workflow::ports::WorkflowService,
};
use tracing::error;
use uuid::Uuid;

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    session::views::SessionResponse,
};

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

#[utoipa::path(
    post,
    path = "/{session_id}/image",
    tag = "session",
    summary = "Upload the fridge photo",
    description = "Attaches a photo sent as the multipart field `image`. Uploading again before confirming replaces the photo.",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
    ),
    responses(
        (status = 200, body = SessionResponse),
        (status = 400, description = "No image selected"),
        (status = 409, description = "Session is past the image step")
    ),
)]
pub async fn upload_image(
    Path(session_id): Path<Uuid>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<SessionResponse>, ApiError> {
    let mut image: Option<ImageAsset> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart field: {}", e);
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().map(|name| name.to_string());
        let mime_type = field
            .content_type()
            .map(|content_type| content_type.to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());

        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;

        if data.len() > MAX_IMAGE_SIZE {
            return Err(ApiError::BadRequest(format!(
                "Image too large. Max size is {} bytes",
                MAX_IMAGE_SIZE
            )));
        }

        image = Some(ImageAsset::new(data, mime_type, file_name));
    }

    let image = image.ok_or_else(|| ApiError::from(CoreError::NoImageSelected))?;

    let session = state
        .service
        .submit_image(session_id, image)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(SessionResponse::from(session)))
}
