use crate::{
    domain::{
        common::services::{Service, StorageSettings},
        dish_image::ports::MockImageGenerationClient,
        recipe::ports::MockLLMClient,
        snap::ports::{MockObjectStoragePort, MockSnapRepository},
    },
    infrastructure::workflow::InMemorySessionRepository,
};

pub type TestService = Service<
    MockLLMClient,
    MockImageGenerationClient,
    MockObjectStoragePort,
    MockSnapRepository,
    InMemorySessionRepository,
>;

/// Builds a service over mocks. Mocks left at their default have no
/// expectations, so any call into them fails the test.
pub struct TestServiceBuilder {
    llm: MockLLMClient,
    images: MockImageGenerationClient,
    storage: MockObjectStoragePort,
    snaps: MockSnapRepository,
}

impl TestServiceBuilder {
    pub fn new() -> Self {
        Self {
            llm: MockLLMClient::new(),
            images: MockImageGenerationClient::new(),
            storage: MockObjectStoragePort::new(),
            snaps: MockSnapRepository::new(),
        }
    }

    pub fn llm(mut self, llm: MockLLMClient) -> Self {
        self.llm = llm;
        self
    }

    pub fn images(mut self, images: MockImageGenerationClient) -> Self {
        self.images = images;
        self
    }

    pub fn storage(mut self, storage: MockObjectStoragePort) -> Self {
        self.storage = storage;
        self
    }

    pub fn snaps(mut self, snaps: MockSnapRepository) -> Self {
        self.snaps = snaps;
        self
    }

    pub fn build(self) -> TestService {
        Service::new(
            self.llm,
            self.images,
            self.storage,
            self.snaps,
            InMemorySessionRepository::default(),
            StorageSettings {
                snap_bucket: "snaps".to_string(),
                generated_bucket: "generated".to_string(),
                public_base_url: "https://storage.test/object/public".to_string(),
            },
        )
    }
}
