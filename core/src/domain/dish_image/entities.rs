use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of candidates requested from the image model; the first one is kept.
pub const DISH_IMAGE_SAMPLE_COUNT: u32 = 4;

pub const DISH_IMAGE_CONTENT_TYPE: &str = "image/png";

/// A generated dish photo after upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DishImage {
    pub bucket: String,
    pub path: String,
    pub public_url: String,
    /// PNG bytes, base64 encoded.
    pub base64: String,
}

pub fn build_dish_prompt(dish_name: &str, description: &str) -> String {
    format!(
        "Extremely minimalistic photograph of {}. {}",
        dish_name.trim(),
        description.trim()
    )
    .trim_end()
    .to_string()
}
