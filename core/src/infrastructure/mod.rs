pub mod db;
pub mod llm;
pub mod object_storage;
pub mod snap;
pub mod workflow;
