use std::future::Future;

use crate::domain::{common::entities::app_errors::CoreError, dish_image::entities::DishImage};

/// Client for a text-to-image model.
#[cfg_attr(test, mockall::automock)]
pub trait ImageGenerationClient: Send + Sync {
    /// Returns the decoded images in the order the model produced them.
    fn generate_images(
        &self,
        prompt: String,
        sample_count: u32,
    ) -> impl Future<Output = Result<Vec<Vec<u8>>, CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait DishImageService: Send + Sync {
    fn generate_dish_image(
        &self,
        dish_name: String,
        description: String,
    ) -> impl Future<Output = Result<DishImage, CoreError>> + Send;
}
