use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service, timestamped_object_key},
    dish_image::{
        entities::{
            DISH_IMAGE_CONTENT_TYPE, DISH_IMAGE_SAMPLE_COUNT, DishImage, build_dish_prompt,
        },
        ports::{DishImageService, ImageGenerationClient},
    },
    recipe::ports::LLMClient,
    snap::{
        ports::{ObjectStoragePort, SnapRepository},
        services::public_object_url,
    },
    workflow::ports::WorkflowSessionRepository,
};

impl<LLM, IG, OS, SR, WS> DishImageService for Service<LLM, IG, OS, SR, WS>
where
    LLM: LLMClient,
    IG: ImageGenerationClient,
    OS: ObjectStoragePort,
    SR: SnapRepository,
    WS: WorkflowSessionRepository,
{
    #[instrument(skip(self, description))]
    async fn generate_dish_image(
        &self,
        dish_name: String,
        description: String,
    ) -> Result<DishImage, CoreError> {
        let prompt = build_dish_prompt(&dish_name, &description);

        let image = self
            .image_client
            .generate_images(prompt, DISH_IMAGE_SAMPLE_COUNT)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                tracing::error!("Image model returned no predictions");
                CoreError::ExternalServiceError("image model returned no predictions".to_string())
            })?;

        let path = timestamped_object_key("png");
        let bucket = self.storage.generated_bucket.clone();
        let base64 = STANDARD.encode(&image);

        self.object_storage
            .put_object(&bucket, &path, Bytes::from(image), DISH_IMAGE_CONTENT_TYPE)
            .await?;

        tracing::info!(bucket = %bucket, path = %path, "Dish image uploaded");

        Ok(DishImage {
            public_url: public_object_url(&self.storage.public_base_url, &bucket, &path),
            bucket,
            path,
            base64,
        })
    }
}
