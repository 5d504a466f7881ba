use chrono::Utc;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    recipe::entities::MealType,
    snap::entities::{Snap, SnapRecipe},
};
use crate::entity::{recipe::Model as RecipeModel, snap::Model as SnapModel};

/// Read a JSON list column. SQL null reads as an empty list.
fn json_list<T: DeserializeOwned>(
    value: &serde_json::Value,
    row_id: Uuid,
    column: &str,
) -> Result<Vec<T>, CoreError> {
    serde_json::from_value::<Option<Vec<T>>>(value.clone())
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            tracing::error!(row_id = %row_id, column, "Stored JSON column is malformed: {}", e);
            CoreError::InternalServerError
        })
}

impl TryFrom<&SnapModel> for Snap {
    type Error = CoreError;

    fn try_from(model: &SnapModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            created_at: model.created_at.with_timezone(&Utc),
            image_url: model.image_url.clone(),
            selected_ingredients: json_list(
                &model.selected_ingredients,
                model.id,
                "selected_ingredients",
            )?,
            raw_recipe_content: model.raw_recipe_content.clone(),
            search_queries: json_list(&model.search_queries, model.id, "search_queries")?,
            grounding_chunks: json_list(&model.grounding_chunks, model.id, "grounding_chunks")?,
        })
    }
}

impl TryFrom<&RecipeModel> for SnapRecipe {
    type Error = CoreError;

    fn try_from(model: &RecipeModel) -> Result<Self, Self::Error> {
        let meal_type = MealType::try_from(model.meal_type.as_str()).map_err(|e| {
            tracing::error!(recipe_id = %model.id, "Stored recipe has {}", e);
            CoreError::InternalServerError
        })?;

        Ok(Self {
            id: model.id,
            parent_snap: model.parent_snap,
            title: model.title.clone(),
            steps: json_list(&model.steps, model.id, "steps")?,
            total_time: model.totaltime.clone(),
            meal_type,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}
