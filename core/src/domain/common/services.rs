use std::sync::Arc;

use crate::domain::{
    dish_image::ports::ImageGenerationClient,
    recipe::ports::LLMClient,
    snap::ports::{ObjectStoragePort, SnapRepository},
    workflow::ports::WorkflowSessionRepository,
};

/// Storage locations the services write to.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub snap_bucket: String,
    pub generated_bucket: String,
    pub public_base_url: String,
}

pub struct Service<LLM, IG, OS, SR, WS>
where
    LLM: LLMClient,
    IG: ImageGenerationClient,
    OS: ObjectStoragePort,
    SR: SnapRepository,
    WS: WorkflowSessionRepository,
{
    pub llm_client: Arc<LLM>,
    pub image_client: Arc<IG>,
    pub object_storage: Arc<OS>,
    pub snap_repository: Arc<SR>,
    pub session_repository: Arc<WS>,
    pub storage: StorageSettings,
}

impl<LLM, IG, OS, SR, WS> Service<LLM, IG, OS, SR, WS>
where
    LLM: LLMClient,
    IG: ImageGenerationClient,
    OS: ObjectStoragePort,
    SR: SnapRepository,
    WS: WorkflowSessionRepository,
{
    pub fn new(
        llm_client: LLM,
        image_client: IG,
        object_storage: OS,
        snap_repository: SR,
        session_repository: WS,
        storage: StorageSettings,
    ) -> Self {
        Self {
            llm_client: Arc::new(llm_client),
            image_client: Arc::new(image_client),
            object_storage: Arc::new(object_storage),
            snap_repository: Arc::new(snap_repository),
            session_repository: Arc::new(session_repository),
            storage,
        }
    }
}

impl<LLM, IG, OS, SR, WS> Clone for Service<LLM, IG, OS, SR, WS>
where
    LLM: LLMClient,
    IG: ImageGenerationClient,
    OS: ObjectStoragePort,
    SR: SnapRepository,
    WS: WorkflowSessionRepository,
{
    fn clone(&self) -> Self {
        Self {
            llm_client: Arc::clone(&self.llm_client),
            image_client: Arc::clone(&self.image_client),
            object_storage: Arc::clone(&self.object_storage),
            snap_repository: Arc::clone(&self.snap_repository),
            session_repository: Arc::clone(&self.session_repository),
            storage: self.storage.clone(),
        }
    }
}
