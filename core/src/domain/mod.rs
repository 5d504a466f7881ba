pub mod common;
pub mod dish_image;
pub mod recipe;
pub mod snap;
pub mod workflow;
