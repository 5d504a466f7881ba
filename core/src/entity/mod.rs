//! `SeaORM` entities for the snap tables.

pub mod prelude;

pub mod recipe;
pub mod snap;
