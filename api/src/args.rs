use clap::{Args as ClapArgs, Parser};
use dachef_core::domain::common::{
    DachefConfig, DatabaseConfig, LLMConfig, ObjectStorageConfig, SessionConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "dachef-api", version, about = "Fridge photo to recipe API")]
pub struct Args {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub db: DatabaseArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ServerArgs {
    #[arg(id = "server-host", long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(id = "server-port", long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    /// Prefix for every route, e.g. `/api`.
    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct DatabaseArgs {
    #[arg(id = "database-host", long = "database-host", env = "DATABASE_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(id = "database-port", long = "database-port", env = "DATABASE_PORT", default_value_t = 5432)]
    pub port: u16,

    #[arg(long = "database-user", env = "DATABASE_USER", default_value = "postgres")]
    pub user: String,

    #[arg(long = "database-password", env = "DATABASE_PASSWORD", default_value = "postgres")]
    pub password: String,

    #[arg(long = "database-name", env = "DATABASE_NAME", default_value = "dachef")]
    pub name: String,

    #[arg(long = "run-migrations", env = "RUN_MIGRATIONS", default_value_t = true, action = clap::ArgAction::Set)]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long = "detection-model", env = "DETECTION_MODEL", default_value = "gemini-2.5-flash")]
    pub detection_model: String,

    #[arg(long = "search-model", env = "SEARCH_MODEL", default_value = "gemini-2.5-flash")]
    pub search_model: String,

    #[arg(long = "parse-model", env = "PARSE_MODEL", default_value = "gemini-2.5-flash-lite")]
    pub parse_model: String,

    #[arg(long = "image-model", env = "IMAGE_MODEL", default_value = "imagen-3.0-generate-002")]
    pub image_model: String,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct StorageArgs {
    #[arg(long = "storage-endpoint", env = "STORAGE_ENDPOINT", default_value = "http://localhost:9000")]
    pub endpoint: String,

    #[arg(long = "storage-region", env = "STORAGE_REGION", default_value = "us-east-1")]
    pub region: String,

    #[arg(long = "storage-access-key", env = "STORAGE_ACCESS_KEY", hide_env_values = true)]
    pub access_key: String,

    #[arg(long = "storage-secret-key", env = "STORAGE_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    #[arg(long = "snap-bucket", env = "SNAP_BUCKET", default_value = "snaps")]
    pub snap_bucket: String,

    #[arg(long = "generated-bucket", env = "GENERATED_BUCKET", default_value = "generated-images")]
    pub generated_bucket: String,

    /// Where the buckets are publicly readable, without the bucket name.
    #[arg(long = "storage-public-url", env = "STORAGE_PUBLIC_URL", default_value = "http://localhost:9000")]
    pub public_url: String,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct SessionArgs {
    /// Sessions idle for longer than this many seconds are dropped.
    #[arg(long = "session-idle-timeout", env = "SESSION_IDLE_TIMEOUT_SECS", default_value_t = 3600)]
    pub idle_timeout_secs: u64,

    #[arg(long = "max-sessions", env = "MAX_SESSIONS", default_value_t = 1000)]
    pub max_sessions: usize,
}

impl From<Args> for DachefConfig {
    fn from(args: Args) -> Self {
        DachefConfig {
            database: DatabaseConfig {
                host: args.db.host,
                port: args.db.port,
                username: args.db.user,
                password: args.db.password,
                name: args.db.name,
                run_migrations: args.db.run_migrations,
            },
            llm: LLMConfig {
                gemini_api_key: args.llm.gemini_api_key,
                detection_model: args.llm.detection_model,
                search_model: args.llm.search_model,
                parse_model: args.llm.parse_model,
                image_model: args.llm.image_model,
            },
            object_storage: ObjectStorageConfig {
                endpoint: args.storage.endpoint,
                region: args.storage.region,
                access_key: args.storage.access_key,
                secret_key: args.storage.secret_key,
                snap_bucket: args.storage.snap_bucket,
                generated_bucket: args.storage.generated_bucket,
                public_base_url: args.storage.public_url,
            },
            session: SessionConfig {
                idle_timeout_secs: args.session.idle_timeout_secs,
                max_sessions: args.session.max_sessions,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_convert_into_core_config() {
        let args = Args::parse_from([
            "dachef-api",
            "--gemini-api-key",
            "key",
            "--storage-access-key",
            "access",
            "--storage-secret-key",
            "secret",
            "--database-name",
            "fridge",
            "--allowed-origins",
            "http://a.test,http://b.test",
            "--max-sessions",
            "50",
        ]);

        assert_eq!(args.server.allowed_origins.len(), 2);

        let config = DachefConfig::from(args);

        assert_eq!(config.database.name, "fridge");
        assert_eq!(config.llm.gemini_api_key, "key");
        assert_eq!(config.object_storage.snap_bucket, "snaps");
        assert_eq!(config.session.max_sessions, 50);
        assert_eq!(config.session.idle_timeout_secs, 3600);
    }
}
