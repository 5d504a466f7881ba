use tracing::instrument;
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    dish_image::ports::ImageGenerationClient,
    recipe::{
        entities::{DetectionItem, ImageAsset},
        ports::{LLMClient, RecipeService},
    },
    snap::{
        entities::PersistenceStatus,
        ports::{ObjectStoragePort, SnapRepository, SnapService},
        value_objects::SaveSnapInput,
    },
    workflow::{
        entities::{WorkflowAction, WorkflowSession},
        ports::{WorkflowService, WorkflowSessionRepository},
    },
};

struct PersistOutcome {
    status: PersistenceStatus,
    image_url: Option<String>,
    error: Option<CoreError>,
}

impl<LLM, IG, OS, SR, WS> Service<LLM, IG, OS, SR, WS>
where
    LLM: LLMClient,
    IG: ImageGenerationClient,
    OS: ObjectStoragePort,
    SR: SnapRepository,
    WS: WorkflowSessionRepository,
{
    async fn load_session(&self, session_id: Uuid) -> Result<WorkflowSession, CoreError> {
        self.session_repository
            .get(session_id)
            .await?
            .ok_or(CoreError::SessionNotFound)
    }

    /// Apply the result of a slow step, but only if the session is still in
    /// the run and stage the step started from. The check and the write
    /// happen under the store's lock. The inner `Err` carries the session as
    /// it is now when it was reset, advanced or replaced meanwhile.
    async fn commit_if_current<F>(
        &self,
        started: &WorkflowSession,
        change: F,
    ) -> Result<Result<WorkflowSession, WorkflowSession>, CoreError>
    where
        F: FnOnce(&mut WorkflowSession) -> Result<(), CoreError> + Send,
    {
        let mut current = true;

        let session = self
            .session_repository
            .update(started.id, |session| {
                if session.same_run(started) && session.stage == started.stage {
                    change(session)
                } else {
                    current = false;
                    Ok(())
                }
            })
            .await?;

        if current {
            Ok(Ok(session))
        } else {
            tracing::debug!(
                session_id = %started.id,
                stage = %session.stage,
                "Session changed while a step was running, dropping its result"
            );
            Ok(Err(session))
        }
    }

    async fn persist_run(&self, session: &WorkflowSession) -> PersistOutcome {
        let Some(image) = session.image.clone() else {
            return PersistOutcome {
                status: PersistenceStatus::Failed {
                    message: CoreError::NoImageSelected.to_string(),
                },
                image_url: None,
                error: Some(CoreError::NoImageSelected),
            };
        };

        let search = session.search_result.clone().unwrap_or_default();

        let snap = match self
            .save_snap(SaveSnapInput {
                image,
                selected_ingredients: session.selection.clone(),
                raw_recipe_content: search.response,
                search_queries: search.search_queries,
                grounding_chunks: search.where_it_searched,
            })
            .await
        {
            Ok(snap) => snap,
            Err(e) => {
                tracing::error!(session_id = %session.id, error = %e, "Failed to save snap");
                return PersistOutcome {
                    status: PersistenceStatus::Failed {
                        message: e.to_string(),
                    },
                    image_url: None,
                    error: Some(e),
                };
            }
        };

        let outcome = self
            .save_recipes(snap.id, session.parsed_recipes.clone())
            .await;
        let status = PersistenceStatus::Saved {
            snap_id: snap.id,
            recipes_saved: outcome.succeeded(),
            recipes_failed: outcome.failed(),
        };

        PersistOutcome {
            status,
            image_url: Some(self.image_url(&snap)),
            error: outcome.into_result().err(),
        }
    }
}

impl<LLM, IG, OS, SR, WS> WorkflowService for Service<LLM, IG, OS, SR, WS>
where
    LLM: LLMClient,
    IG: ImageGenerationClient,
    OS: ObjectStoragePort,
    SR: SnapRepository,
    WS: WorkflowSessionRepository,
{
    #[instrument(skip(self))]
    async fn start_session(&self) -> Result<WorkflowSession, CoreError> {
        let session = WorkflowSession::new();
        self.session_repository.save(session.clone()).await?;

        tracing::info!(session_id = %session.id, "Session started");

        Ok(session)
    }

    #[instrument(skip(self, image), fields(size = image.bytes.len()))]
    async fn submit_image(
        &self,
        session_id: Uuid,
        image: ImageAsset,
    ) -> Result<WorkflowSession, CoreError> {
        if image.is_empty() {
            return Err(CoreError::NoImageSelected);
        }

        self.session_repository
            .update(session_id, |session| {
                session.apply(WorkflowAction::ImageAcquired)?;
                session.image = Some(image);
                session.last_error = None;
                Ok(())
            })
            .await
    }

    #[instrument(skip(self))]
    async fn confirm_image(&self, session_id: Uuid) -> Result<WorkflowSession, CoreError> {
        let session = self
            .session_repository
            .update(session_id, |session| {
                if session.image.is_none() {
                    session.ensure_allowed(WorkflowAction::Confirm)?;
                    return Err(CoreError::NoImageSelected);
                }
                session.apply(WorkflowAction::Confirm).map(|_| ())
            })
            .await?;
        let image = session.image.clone().ok_or(CoreError::NoImageSelected)?;

        let detected = self.detect(image).await;

        let current = match self
            .commit_if_current(&session, |current| match &detected {
                Ok(items) => {
                    current.detected_items = items.clone();
                    current.apply(WorkflowAction::DetectionCompleted).map(|_| ())
                }
                Err(e) => {
                    current.last_error = Some(e.to_string());
                    Ok(())
                }
            })
            .await?
        {
            Ok(current) => current,
            Err(moved_on) => return Ok(moved_on),
        };

        detected.map(|_| current)
    }

    #[instrument(skip(self, labels), fields(count = labels.len()))]
    async fn select_items(
        &self,
        session_id: Uuid,
        labels: Vec<String>,
    ) -> Result<WorkflowSession, CoreError> {
        let mut chosen = Vec::new();

        let session = self
            .session_repository
            .update(session_id, |session| {
                session.ensure_allowed(WorkflowAction::SelectionMade)?;

                if labels.is_empty() {
                    return Err(CoreError::EmptySelection);
                }

                chosen = labels
                    .iter()
                    .map(|label| {
                        session
                            .detected_items
                            .iter()
                            .find(|item| &item.label == label)
                            .cloned()
                            .ok_or_else(|| CoreError::UnknownItem(label.clone()))
                    })
                    .collect::<Result<Vec<DetectionItem>, CoreError>>()?;

                session.apply(WorkflowAction::SelectionMade)?;
                session.selection = labels;
                session.last_error = None;
                Ok(())
            })
            .await?;

        let result = self.search(chosen).await;

        let current = match self
            .commit_if_current(&session, |current| {
                current.search_result = Some(result);
                current.apply(WorkflowAction::SearchCompleted).map(|_| ())
            })
            .await?
        {
            Ok(current) => current,
            Err(moved_on) => return Ok(moved_on),
        };

        Ok(current)
    }

    #[instrument(skip(self))]
    async fn complete_recipe(&self, session_id: Uuid) -> Result<WorkflowSession, CoreError> {
        let session = self.load_session(session_id).await?;
        session.ensure_allowed(WorkflowAction::ParseCompleted)?;

        let raw_text = session
            .search_result
            .as_ref()
            .map(|result| result.response.clone())
            .unwrap_or_default();

        let parsed = self.parse_recipe(raw_text).await;

        // Only one parse per run gets past this point: the first commit moves
        // the stage on, so any other parse of the same run is dropped here.
        let current = match self
            .commit_if_current(&session, |current| match &parsed {
                Ok(recipes) => {
                    current.parsed_recipes = recipes.clone();
                    current.last_error = None;
                    current.apply(WorkflowAction::ParseCompleted).map(|_| ())
                }
                Err(e) => {
                    current.last_error = Some(e.to_string());
                    Ok(())
                }
            })
            .await?
        {
            Ok(current) => current,
            Err(moved_on) => return Ok(moved_on),
        };

        if let Err(e) = parsed {
            tracing::error!(session_id = %session_id, error = %e, "Recipe parsing failed");
            return Err(e);
        }

        let PersistOutcome {
            status,
            image_url,
            error,
        } = self.persist_run(&current).await;

        let latest = match self
            .commit_if_current(&current, |latest| {
                latest.persistence = status;
                if image_url.is_some() {
                    latest.image_url = image_url;
                }
                if let Some(e) = &error {
                    latest.last_error = Some(e.to_string());
                }
                // The photo has been handed to storage, or failed to be; the
                // session keeps only its URL from here on.
                latest.image = None;
                Ok(())
            })
            .await?
        {
            Ok(latest) => latest,
            Err(moved_on) => return Ok(moved_on),
        };

        tracing::info!(
            session_id = %latest.id,
            recipes = latest.parsed_recipes.len(),
            "Recipe run completed"
        );

        Ok(latest)
    }

    #[instrument(skip(self))]
    async fn replace_image(&self, session_id: Uuid) -> Result<WorkflowSession, CoreError> {
        self.session_repository
            .update(session_id, |session| {
                session.apply(WorkflowAction::Reset).map(|_| ())
            })
            .await
    }

    #[instrument(skip(self))]
    async fn resume_from_snap(&self, snap_id: Uuid) -> Result<WorkflowSession, CoreError> {
        let saved = self.get_snap(snap_id).await?;
        let image_url = self.image_url(&saved.snap);
        let session = WorkflowSession::from_snap(saved, image_url);

        self.session_repository.save(session.clone()).await?;

        tracing::info!(session_id = %session.id, snap_id = %snap_id, "Session resumed from snap");

        Ok(session)
    }

    async fn get_session(&self, session_id: Uuid) -> Result<WorkflowSession, CoreError> {
        self.load_session(session_id).await
    }

    #[instrument(skip(self))]
    async fn discard_session(&self, session_id: Uuid) -> Result<(), CoreError> {
        if self.session_repository.delete(session_id).await? {
            Ok(())
        } else {
            Err(CoreError::SessionNotFound)
        }
    }
}
