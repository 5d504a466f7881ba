use dachef_core::domain::snap::entities::SnapWithRecipes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Saved snap with its recipes and a URL the photo can be fetched from.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SnapView {
    #[serde(flatten)]
    pub snap: SnapWithRecipes,
    pub public_image_url: String,
}
