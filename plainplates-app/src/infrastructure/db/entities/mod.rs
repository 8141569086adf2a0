pub mod category;
pub mod favorite;
pub mod recipe;
pub mod recipe_category;
pub mod user;
pub mod vote;

pub use category::Entity as Category;
pub use favorite::Entity as Favorite;
pub use recipe::Entity as Recipe;
pub use recipe_category::Entity as RecipeCategory;
pub use user::Entity as User;
pub use vote::Entity as Vote;
