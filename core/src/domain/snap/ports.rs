use std::future::Future;

use bytes::Bytes;
use uuid::Uuid;

use crate::domain::common::entities::app_errors::CoreError;

use crate::domain::recipe::entities::ParsedRecipe;

use super::entities::{BatchOutcome, Snap, SnapRecipe, SnapWithRecipes};
use super::value_objects::{CreateSnap, CreateSnapRecipe, SaveSnapInput};

/// Port for S3-compatible object storage
#[cfg_attr(test, mockall::automock)]
pub trait ObjectStoragePort: Send + Sync {
    /// Upload an object directly to storage
    fn put_object(
        &self,
        bucket: &str,
        object_key: &str,
        payload: Bytes,
        content_type: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait SnapRepository: Send + Sync {
    fn create_snap(&self, input: CreateSnap)
    -> impl Future<Output = Result<Snap, CoreError>> + Send;

    fn create_recipe(
        &self,
        input: CreateSnapRecipe,
    ) -> impl Future<Output = Result<SnapRecipe, CoreError>> + Send;

    /// Most recent snaps first.
    fn list_recent(&self, limit: u64) -> impl Future<Output = Result<Vec<Snap>, CoreError>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<Snap>, CoreError>> + Send;

    fn get_recipes_by_snap(
        &self,
        snap_id: Uuid,
    ) -> impl Future<Output = Result<Vec<SnapRecipe>, CoreError>> + Send;
}

/// Saving and reading back finished runs.
#[cfg_attr(test, mockall::automock)]
pub trait SnapService: Send + Sync {
    /// Upload the photo, then insert the snap row that points at it.
    fn save_snap(&self, input: SaveSnapInput)
    -> impl Future<Output = Result<Snap, CoreError>> + Send;

    /// Insert one row per recipe, concurrently, and report each outcome.
    fn save_recipes(
        &self,
        snap_id: Uuid,
        recipes: Vec<ParsedRecipe>,
    ) -> impl Future<Output = BatchOutcome<SnapRecipe>> + Send;

    fn list_recent_snaps(
        &self,
        limit: Option<u64>,
    ) -> impl Future<Output = Result<Vec<SnapWithRecipes>, CoreError>> + Send;

    fn get_snap(
        &self,
        snap_id: Uuid,
    ) -> impl Future<Output = Result<SnapWithRecipes, CoreError>> + Send;

    /// Public URL of the stored photo.
    fn image_url(&self, snap: &Snap) -> String;
}
