use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    dish_image::ports::ImageGenerationClient,
    recipe::{
        entities::{DetectionItem, ImageAsset, ParsedRecipe, SearchResult},
        helpers::{extract_fenced_json, fallback_recipe_suggestion},
        ports::{LLMClient, RecipeService},
        prompts::{
            DETECTION_PROMPT, DETECTION_SYSTEM_INSTRUCTION, MAX_DETECTED_ITEMS,
            PARSE_SYSTEM_INSTRUCTION, SEARCH_SYSTEM_INSTRUCTION, build_parse_prompt,
            build_search_prompt,
        },
    },
    snap::ports::{ObjectStoragePort, SnapRepository},
    workflow::ports::WorkflowSessionRepository,
};

impl<LLM, IG, OS, SR, WS> RecipeService for Service<LLM, IG, OS, SR, WS>
where
    LLM: LLMClient,
    IG: ImageGenerationClient,
    OS: ObjectStoragePort,
    SR: SnapRepository,
    WS: WorkflowSessionRepository,
{
    #[instrument(skip(self, image), fields(size = image.bytes.len(), mime_type = %image.mime_type))]
    async fn detect(&self, image: ImageAsset) -> Result<Vec<DetectionItem>, CoreError> {
        if image.is_empty() {
            return Err(CoreError::Detection("no image supplied".to_string()));
        }

        let raw_response = match self
            .llm_client
            .generate_with_image(
                DETECTION_PROMPT.to_string(),
                DETECTION_SYSTEM_INSTRUCTION.to_string(),
                image,
            )
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Item detection call failed");
                return Ok(Vec::new());
            }
        };

        let json = extract_fenced_json(&raw_response);
        let mut items: Vec<DetectionItem> = match serde_json::from_str(&json) {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse detection response");
                return Ok(Vec::new());
            }
        };

        items.truncate(MAX_DETECTED_ITEMS);
        tracing::info!(count = items.len(), "Detected items");

        Ok(items)
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn search(&self, items: Vec<DetectionItem>) -> SearchResult {
        let ingredients: Vec<String> = items.into_iter().map(|item| item.label).collect();

        if ingredients.is_empty() {
            return SearchResult::empty();
        }

        let grounded = match self
            .llm_client
            .generate_with_search(
                build_search_prompt(&ingredients),
                SEARCH_SYSTEM_INSTRUCTION.to_string(),
            )
            .await
        {
            Ok(grounded) => grounded,
            Err(e) => {
                tracing::error!(error = %e, "Recipe search call failed");
                return SearchResult::empty();
            }
        };

        let response = if grounded.text.trim().is_empty() {
            tracing::warn!("Recipe search returned no text, using fallback suggestion");
            fallback_recipe_suggestion(&ingredients)
        } else {
            grounded.text
        };

        tracing::info!(
            queries = grounded.web_search_queries.len(),
            sources = grounded.grounding_chunks.len(),
            "Recipe search complete"
        );

        SearchResult {
            search_queries: grounded.web_search_queries,
            where_it_searched: grounded.grounding_chunks,
            response,
        }
    }

    #[instrument(skip(self, raw_text), fields(length = raw_text.len()))]
    async fn parse_recipe(&self, raw_text: String) -> Result<Vec<ParsedRecipe>, CoreError> {
        if raw_text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let raw_response = self
            .llm_client
            .generate_with_text(
                build_parse_prompt(&raw_text),
                PARSE_SYSTEM_INSTRUCTION.to_string(),
            )
            .await?;

        let json = extract_fenced_json(&raw_response);
        let recipes: Vec<ParsedRecipe> = serde_json::from_str(&json).map_err(|e| {
            tracing::error!(error = %e, "Recipe text did not match the recipe schema");
            CoreError::RecipeParse(e.to_string())
        })?;

        tracing::info!(count = recipes.len(), "Parsed recipes");

        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::domain::{
        common::testing::TestServiceBuilder,
        recipe::{
            entities::{GroundedResponse, GroundingChunk, MealType},
            ports::MockLLMClient,
        },
    };

    fn fridge_photo() -> ImageAsset {
        ImageAsset::new(Bytes::from_static(b"\xff\xd8jpeg"), "image/jpeg", None)
    }

    #[tokio::test]
    async fn detect_reads_fenced_item_list() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_image().times(1).returning(|_, _, _| {
            Box::pin(async {
                Ok("```json\n[{\"label\": \"Egg\"}, {\"label\": \"Milk\", \"quantity\": 2}]\n```".to_string())
            })
        });
        let service = TestServiceBuilder::new().llm(llm).build();

        let items = service.detect(fridge_photo()).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "Egg");
        assert_eq!(items[1].extra.get("quantity"), Some(&serde_json::json!(2)));
    }

    #[tokio::test]
    async fn detect_without_image_is_an_error() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_image().never();
        let service = TestServiceBuilder::new().llm(llm).build();

        let result = service
            .detect(ImageAsset::new(Bytes::new(), "image/jpeg", None))
            .await;

        assert!(matches!(result, Err(CoreError::Detection(_))));
    }

    #[tokio::test]
    async fn detect_degrades_to_empty_when_the_call_fails() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_image().returning(|_, _, _| {
            Box::pin(async { Err(CoreError::ExternalServiceError("quota".to_string())) })
        });
        let service = TestServiceBuilder::new().llm(llm).build();

        assert!(service.detect(fridge_photo()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn detect_degrades_to_empty_on_unreadable_output() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_image()
            .returning(|_, _, _| Box::pin(async { Ok("I see a fridge.".to_string()) }));
        let service = TestServiceBuilder::new().llm(llm).build();

        assert!(service.detect(fridge_photo()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn detect_caps_the_item_count() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_image().returning(|_, _, _| {
            let items: Vec<_> = (0..150)
                .map(|i| serde_json::json!({ "label": format!("item {}", i) }))
                .collect();
            let text = serde_json::to_string(&items).unwrap();
            Box::pin(async move { Ok(text) })
        });
        let service = TestServiceBuilder::new().llm(llm).build();

        assert_eq!(service.detect(fridge_photo()).await.unwrap().len(), MAX_DETECTED_ITEMS);
    }

    #[tokio::test]
    async fn search_without_items_makes_no_call() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_search().never();
        let service = TestServiceBuilder::new().llm(llm).build();

        let result = service.search(Vec::new()).await;

        assert_eq!(result, SearchResult::empty());
        assert!(result.search_queries.is_empty());
        assert!(result.where_it_searched.is_empty());
        assert_eq!(result.response, "");
    }

    #[tokio::test]
    async fn search_copies_grounding_metadata() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_search()
            .withf(|prompt, _| prompt.contains("Egg, Milk"))
            .returning(|_, _| {
                Box::pin(async {
                    Ok(GroundedResponse {
                        text: "# Recipe\nFrench toast".to_string(),
                        web_search_queries: vec!["egg milk recipe".to_string()],
                        grounding_chunks: vec![GroundingChunk::new("Allrecipes", "https://allrecipes.com/1")],
                    })
                })
            });
        let service = TestServiceBuilder::new().llm(llm).build();

        let result = service
            .search(vec![DetectionItem::new("Egg"), DetectionItem::new("Milk")])
            .await;

        assert_eq!(result.response, "# Recipe\nFrench toast");
        assert_eq!(result.search_queries, vec!["egg milk recipe".to_string()]);
        assert_eq!(result.where_it_searched[0].web.title, "Allrecipes");
    }

    #[tokio::test]
    async fn search_fails_closed() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_search().returning(|_, _| {
            Box::pin(async { Err(CoreError::ExternalServiceError("timeout".to_string())) })
        });
        let service = TestServiceBuilder::new().llm(llm).build();

        let result = service.search(vec![DetectionItem::new("Egg")]).await;

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn search_with_blank_answer_uses_fallback_text() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_search()
            .returning(|_, _| Box::pin(async { Ok(GroundedResponse::default()) }));
        let service = TestServiceBuilder::new().llm(llm).build();

        let result = service.search(vec![DetectionItem::new("Egg")]).await;

        assert!(result.response.contains("- Egg"));
        assert!(result.search_queries.is_empty());
    }

    #[tokio::test]
    async fn parse_recipe_reads_fenced_schema() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().returning(|_, _| {
            Box::pin(async {
                Ok(r#"```json
[{"type": "breakfast", "title": "French toast", "totalTime": "20 minutes",
  "steps": [{"description": "Soak bread", "timeToComplete": "5 minutes", "ingredients": ["Egg", "Milk"]}]}]
```"#
                    .to_string())
            })
        });
        let service = TestServiceBuilder::new().llm(llm).build();

        let recipes = service.parse_recipe("# Recipe\n...".to_string()).await.unwrap();

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].meal_type, MealType::Breakfast);
        assert_eq!(recipes[0].steps[0].ingredients, vec!["Egg", "Milk"]);
    }

    #[tokio::test]
    async fn parse_recipe_rejects_malformed_output() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .returning(|_, _| Box::pin(async { Ok("Sorry, I can't do that.".to_string()) }));
        let service = TestServiceBuilder::new().llm(llm).build();

        let result = service.parse_recipe("# Recipe".to_string()).await;

        assert!(matches!(result, Err(CoreError::RecipeParse(_))));
    }

    #[tokio::test]
    async fn parse_recipe_propagates_call_failure() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().returning(|_, _| {
            Box::pin(async { Err(CoreError::ExternalServiceError("down".to_string())) })
        });
        let service = TestServiceBuilder::new().llm(llm).build();

        assert!(service.parse_recipe("# Recipe".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn parse_recipe_of_blank_text_is_empty() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().never();
        let service = TestServiceBuilder::new().llm(llm).build();

        assert!(service.parse_recipe("  ".to_string()).await.unwrap().is_empty());
    }
}
