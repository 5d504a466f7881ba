use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use tracing::error;
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_uuid_v7},
    snap::{
        entities::{Snap, SnapRecipe},
        ports::SnapRepository,
        value_objects::{CreateSnap, CreateSnapRecipe},
    },
};
use crate::entity::{
    recipe::{
        ActiveModel as RecipeActiveModel, Column as RecipeColumn, Entity as RecipeEntity,
    },
    snap::{ActiveModel as SnapActiveModel, Column as SnapColumn, Entity as SnapEntity},
};

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value).map_err(|e| {
        error!("Failed to serialize column value: {}", e);
        CoreError::WriteError(e.to_string())
    })
}

#[derive(Debug, Clone)]
pub struct PostgresSnapRepository {
    pub db: DatabaseConnection,
}

impl PostgresSnapRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl SnapRepository for PostgresSnapRepository {
    async fn create_snap(&self, input: CreateSnap) -> Result<Snap, CoreError> {
        let active_model = SnapActiveModel {
            id: Set(generate_uuid_v7()),
            created_at: Set(Utc::now().fixed_offset()),
            image_url: Set(input.image_url),
            selected_ingredients: Set(to_json(&input.selected_ingredients)?),
            raw_recipe_content: Set(input.raw_recipe_content),
            search_queries: Set(to_json(&input.search_queries)?),
            grounding_chunks: Set(to_json(&input.grounding_chunks)?),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            error!("Failed to create snap: {}", e);
            CoreError::WriteError(e.to_string())
        })?;

        Snap::try_from(&model)
    }

    async fn create_recipe(&self, input: CreateSnapRecipe) -> Result<SnapRecipe, CoreError> {
        let active_model = RecipeActiveModel {
            id: Set(generate_uuid_v7()),
            parent_snap: Set(input.parent_snap),
            title: Set(input.recipe.title),
            steps: Set(to_json(&input.recipe.steps)?),
            totaltime: Set(input.recipe.total_time),
            meal_type: Set(input.recipe.meal_type.as_str().to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            error!(parent_snap = %input.parent_snap, "Failed to create recipe: {}", e);
            CoreError::WriteError(e.to_string())
        })?;

        SnapRecipe::try_from(&model)
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Snap>, CoreError> {
        let models = SnapEntity::find()
            .order_by_desc(SnapColumn::CreatedAt)
            .order_by_desc(SnapColumn::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to list snaps: {}", e);
                CoreError::InternalServerError
            })?;

        models.iter().map(Snap::try_from).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Snap>, CoreError> {
        let model = SnapEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                error!(snap_id = %id, "Failed to get snap: {}", e);
                CoreError::InternalServerError
            })?;

        model.as_ref().map(Snap::try_from).transpose()
    }

    async fn get_recipes_by_snap(&self, snap_id: Uuid) -> Result<Vec<SnapRecipe>, CoreError> {
        let models = RecipeEntity::find()
            .filter(RecipeColumn::ParentSnap.eq(snap_id))
            .order_by_asc(RecipeColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!(snap_id = %snap_id, "Failed to get recipes for snap: {}", e);
                CoreError::InternalServerError
            })?;

        models.iter().map(SnapRecipe::try_from).collect()
    }
}
