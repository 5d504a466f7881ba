pub mod mappers;
pub mod repositories;

pub use repositories::snap_repository::PostgresSnapRepository;
