use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SelectItemsValidator {
    /// Labels exactly as returned by detection.
    #[validate(length(max = 100, message = "at most 100 labels can be selected"))]
    #[serde(default)]
    pub labels: Vec<String>,
}
