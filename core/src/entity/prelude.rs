pub use super::recipe::Entity as Recipe;
pub use super::snap::Entity as Snap;
