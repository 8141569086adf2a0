mod edit_recipe;
mod submit_recipe;

pub use edit_recipe::{validate_edit, EditRecipe};
pub use submit_recipe::{StructuringBackend, SubmitRecipe};
