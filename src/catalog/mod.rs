pub mod ingredients;
pub mod item;

pub use ingredients::{normalize_label, IngredientSet};
pub use item::{CatalogItem, ProductType};
