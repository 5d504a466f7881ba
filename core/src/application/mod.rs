use crate::{
    domain::common::{
        DachefConfig,
        services::{Service, StorageSettings},
    },
    infrastructure::{
        db::postgres::{Postgres, PostgresConfig},
        llm::GeminiLLMClient,
        object_storage::S3ObjectStorage,
        snap::PostgresSnapRepository,
        workflow::InMemorySessionRepository,
    },
};

pub type DachefService = Service<
    GeminiLLMClient,
    GeminiLLMClient,
    S3ObjectStorage,
    PostgresSnapRepository,
    InMemorySessionRepository,
>;

pub async fn create_service(config: DachefConfig) -> Result<DachefService, anyhow::Error> {
    let postgres = Postgres::new(PostgresConfig {
        database_url: config.database.url(),
    })
    .await?;

    if config.database.run_migrations {
        postgres.run_migrations().await?;
    }

    let gemini = GeminiLLMClient::new(config.llm.clone());
    let object_storage = S3ObjectStorage::new(&config.object_storage);
    let snap_repository = PostgresSnapRepository::new(postgres.get_db());

    Ok(Service::new(
        gemini.clone(),
        gemini,
        object_storage,
        snap_repository,
        InMemorySessionRepository::new(&config.session),
        StorageSettings {
            snap_bucket: config.object_storage.snap_bucket,
            generated_bucket: config.object_storage.generated_bucket,
            public_base_url: config.object_storage.public_base_url,
        },
    ))
}
