use futures::future::join_all;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service, timestamped_object_key},
    dish_image::ports::ImageGenerationClient,
    recipe::{entities::ParsedRecipe, ports::LLMClient},
    snap::{
        entities::{BatchOutcome, Snap, SnapRecipe, SnapWithRecipes},
        ports::{ObjectStoragePort, SnapRepository, SnapService},
        value_objects::{CreateSnap, CreateSnapRecipe, SaveSnapInput, clamp_snap_limit},
    },
    workflow::ports::WorkflowSessionRepository,
};

pub fn public_object_url(base_url: &str, bucket: &str, object_key: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), bucket, object_key)
}

impl<LLM, IG, OS, SR, WS> SnapService for Service<LLM, IG, OS, SR, WS>
where
    LLM: LLMClient,
    IG: ImageGenerationClient,
    OS: ObjectStoragePort,
    SR: SnapRepository,
    WS: WorkflowSessionRepository,
{
    #[instrument(skip(self, input), fields(ingredients = input.selected_ingredients.len()))]
    async fn save_snap(&self, input: SaveSnapInput) -> Result<Snap, CoreError> {
        let object_key = timestamped_object_key(&input.image.extension());

        self.object_storage
            .put_object(
                &self.storage.snap_bucket,
                &object_key,
                input.image.bytes.clone(),
                &input.image.mime_type,
            )
            .await?;

        let snap = self
            .snap_repository
            .create_snap(CreateSnap {
                image_url: object_key,
                selected_ingredients: input.selected_ingredients,
                raw_recipe_content: input.raw_recipe_content,
                search_queries: input.search_queries,
                grounding_chunks: input.grounding_chunks,
            })
            .await?;

        tracing::info!(snap_id = %snap.id, image = %snap.image_url, "Snap saved");

        Ok(snap)
    }

    #[instrument(skip(self, recipes), fields(count = recipes.len()))]
    async fn save_recipes(&self, snap_id: Uuid, recipes: Vec<ParsedRecipe>) -> BatchOutcome<SnapRecipe> {
        let inserts = recipes.into_iter().map(|recipe| {
            self.snap_repository.create_recipe(CreateSnapRecipe {
                parent_snap: snap_id,
                recipe,
            })
        });

        let outcome = BatchOutcome::new(join_all(inserts).await);

        if outcome.is_complete() {
            tracing::info!(saved = outcome.succeeded(), "Recipes saved");
        } else {
            tracing::error!(
                saved = outcome.succeeded(),
                failed = outcome.failed(),
                "Some recipes could not be saved"
            );
        }

        outcome
    }

    #[instrument(skip(self))]
    async fn list_recent_snaps(&self, limit: Option<u64>) -> Result<Vec<SnapWithRecipes>, CoreError> {
        let snaps = self
            .snap_repository
            .list_recent(clamp_snap_limit(limit))
            .await?;

        let lookups = snaps
            .iter()
            .map(|snap| self.snap_repository.get_recipes_by_snap(snap.id));
        let recipes = join_all(lookups).await;

        snaps
            .into_iter()
            .zip(recipes)
            .map(|(snap, recipes)| recipes.map(|recipes| SnapWithRecipes { snap, recipes }))
            .collect()
    }

    #[instrument(skip(self))]
    async fn get_snap(&self, snap_id: Uuid) -> Result<SnapWithRecipes, CoreError> {
        let snap = self
            .snap_repository
            .get_by_id(snap_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        let recipes = self.snap_repository.get_recipes_by_snap(snap.id).await?;

        Ok(SnapWithRecipes { snap, recipes })
    }

    fn image_url(&self, snap: &Snap) -> String {
        public_object_url(
            &self.storage.public_base_url,
            &self.storage.snap_bucket,
            &snap.image_url,
        )
    }
}
