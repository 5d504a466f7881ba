use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    recipe::entities::{DetectionItem, GroundedResponse, ImageAsset, ParsedRecipe, SearchResult},
};

/// LLM Client trait for calling AI models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    /// Multimodal call used for item detection.
    fn generate_with_image(
        &self,
        prompt: String,
        system_instruction: String,
        image: ImageAsset,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Text generation with web-search grounding enabled.
    fn generate_with_search(
        &self,
        prompt: String,
        system_instruction: String,
    ) -> impl Future<Output = Result<GroundedResponse, CoreError>> + Send;

    /// Plain text generation on the cheaper parsing model.
    fn generate_with_text(
        &self,
        prompt: String,
        system_instruction: String,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Prompt/response adapter over the three generation calls.
#[cfg_attr(test, mockall::automock)]
pub trait RecipeService: Send + Sync {
    fn detect(
        &self,
        image: ImageAsset,
    ) -> impl Future<Output = Result<Vec<DetectionItem>, CoreError>> + Send;

    fn search(&self, items: Vec<DetectionItem>) -> impl Future<Output = SearchResult> + Send;

    fn parse_recipe(
        &self,
        raw_text: String,
    ) -> impl Future<Output = Result<Vec<ParsedRecipe>, CoreError>> + Send;
}
