pub mod auth;
pub mod edit;
pub mod favorites;
pub mod recipes;
pub mod submit;

use axum::response::Redirect;

fn to_recipe(slug: &str) -> Redirect {
    Redirect::to(&format!("/recipes/{}", urlencoding::encode(slug)))
}
