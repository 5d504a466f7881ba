use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    recipe::entities::{GroundingChunk, MealType, ParsedRecipe, RecipeStep, SearchResult},
};

/// Durable record of one completed photo-to-recipe run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Snap {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Object key of the uploaded photo inside the snap bucket.
    pub image_url: String,
    pub selected_ingredients: Vec<String>,
    pub raw_recipe_content: String,
    pub search_queries: Vec<String>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

impl Snap {
    /// The search result this snap was saved from.
    pub fn search_result(&self) -> SearchResult {
        SearchResult {
            search_queries: self.search_queries.clone(),
            where_it_searched: self.grounding_chunks.clone(),
            response: self.raw_recipe_content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SnapRecipe {
    pub id: Uuid,
    pub parent_snap: Uuid,
    pub title: String,
    pub steps: Vec<RecipeStep>,
    pub total_time: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub created_at: DateTime<Utc>,
}

impl From<SnapRecipe> for ParsedRecipe {
    fn from(recipe: SnapRecipe) -> Self {
        ParsedRecipe {
            meal_type: recipe.meal_type,
            title: recipe.title,
            total_time: recipe.total_time,
            steps: recipe.steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SnapWithRecipes {
    #[serde(flatten)]
    pub snap: Snap,
    pub recipes: Vec<SnapRecipe>,
}

/// Per-item results of a batch of independent writes, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<T> {
    pub results: Vec<Result<T, CoreError>>,
}

impl<T> BatchOutcome<T> {
    pub fn new(results: Vec<Result<T, CoreError>>) -> Self {
        Self { results }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|result| result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    /// Collapse into the written items, or one aggregate error if any write failed.
    pub fn into_result(self) -> Result<Vec<T>, CoreError> {
        let total = self.total();
        let failed = self.failed();

        if failed > 0 {
            return Err(CoreError::PartialWrite { failed, total });
        }

        Ok(self.results.into_iter().filter_map(Result::ok).collect())
    }
}

/// Outcome of the background save that follows a finished recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceStatus {
    #[default]
    NotStarted,
    Saved {
        snap_id: Uuid,
        recipes_saved: usize,
        recipes_failed: usize,
    },
    Failed {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_outcome_reports_a_single_aggregate_failure() {
        let outcome = BatchOutcome::new(vec![
            Ok(1),
            Err(CoreError::WriteError("duplicate key".to_string())),
            Ok(3),
        ]);

        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failed(), 1);
        assert!(!outcome.is_complete());
        assert_eq!(
            outcome.into_result(),
            Err(CoreError::PartialWrite {
                failed: 1,
                total: 3
            })
        );
    }

    #[test]
    fn empty_batch_is_complete() {
        let outcome: BatchOutcome<u8> = BatchOutcome::new(Vec::new());

        assert!(outcome.is_complete());
        assert_eq!(outcome.into_result(), Ok(Vec::new()));
    }

    #[test]
    fn persistence_status_is_tagged() {
        let value = serde_json::to_value(PersistenceStatus::Failed {
            message: "bucket missing".to_string(),
        })
        .unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["message"], "bucket missing");
        assert_eq!(
            serde_json::to_value(PersistenceStatus::NotStarted).unwrap()["status"],
            "not_started"
        );
    }

    #[test]
    fn snap_recipe_becomes_parsed_recipe() {
        let recipe = SnapRecipe {
            id: Uuid::new_v4(),
            parent_snap: Uuid::new_v4(),
            title: "Pancakes".to_string(),
            steps: vec![],
            total_time: "30 minutes".to_string(),
            meal_type: MealType::Breakfast,
            created_at: Utc::now(),
        };

        let parsed = ParsedRecipe::from(recipe);

        assert_eq!(parsed.title, "Pancakes");
        assert_eq!(parsed.meal_type, MealType::Breakfast);
    }
}
