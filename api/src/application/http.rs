pub mod dish_image;
pub mod health;
pub mod server;
pub mod session;
pub mod snap;
