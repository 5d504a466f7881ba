use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenerateDishImageValidator {
    #[validate(length(min = 1, max = 200, message = "dish_name must be between 1 and 200 characters"))]
    pub dish_name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: String,
}
