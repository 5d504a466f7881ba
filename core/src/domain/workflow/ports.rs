use std::future::Future;

use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError, recipe::entities::ImageAsset,
    workflow::entities::WorkflowSession,
};

/// Store of live sessions.
pub trait WorkflowSessionRepository: Send + Sync {
    fn get(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<WorkflowSession>, CoreError>> + Send;

    /// Insert or replace.
    fn save(&self, session: WorkflowSession) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Read, change and write back one session as a single step, so two
    /// callers never both act on the same stored state. Nothing is written
    /// when `change` fails.
    fn update<F>(
        &self,
        id: Uuid,
        change: F,
    ) -> impl Future<Output = Result<WorkflowSession, CoreError>> + Send
    where
        F: FnOnce(&mut WorkflowSession) -> Result<(), CoreError> + Send;

    /// Returns whether a session was removed.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, CoreError>> + Send;
}

/// Drives a session from photo to parsed recipe.
#[cfg_attr(test, mockall::automock)]
pub trait WorkflowService: Send + Sync {
    fn start_session(&self) -> impl Future<Output = Result<WorkflowSession, CoreError>> + Send;

    fn submit_image(
        &self,
        session_id: Uuid,
        image: ImageAsset,
    ) -> impl Future<Output = Result<WorkflowSession, CoreError>> + Send;

    /// Confirm the photo and run detection on it.
    fn confirm_image(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = Result<WorkflowSession, CoreError>> + Send;

    /// Record the chosen labels and run the recipe search. Returns as soon as
    /// the raw recipe text is available; parsing is left to `complete_recipe`.
    fn select_items(
        &self,
        session_id: Uuid,
        labels: Vec<String>,
    ) -> impl Future<Output = Result<WorkflowSession, CoreError>> + Send;

    /// Parse the raw recipe text, then save the run.
    fn complete_recipe(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = Result<WorkflowSession, CoreError>> + Send;

    fn replace_image(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = Result<WorkflowSession, CoreError>> + Send;

    fn resume_from_snap(
        &self,
        snap_id: Uuid,
    ) -> impl Future<Output = Result<WorkflowSession, CoreError>> + Send;

    fn get_session(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = Result<WorkflowSession, CoreError>> + Send;

    fn discard_session(&self, session_id: Uuid) -> impl Future<Output = Result<(), CoreError>> + Send;
}
