use super::to_recipe;
use crate::error::PageResult;
use crate::pages::{FavoritesPage, Html};
use crate::session::CurrentCaller;
use axum::extract::{Path, State};
use axum::response::Redirect;
use plainplates_app::infrastructure::db::db_error;
use plainplates_app::AppContext;
use plainplates_errors::AppError;

pub async fn list(State(ctx): State<AppContext>, current: CurrentCaller) -> PageResult<Html<FavoritesPage>> {
    let user = current.require_user()?;

    let ids = ctx
        .favorites
        .recipe_ids_of(user.id)
        .await
        .map_err(db_error)?;
    let recipes = ctx
        .recipes
        .summaries_in_order(&ids)
        .await
        .map_err(db_error)?;

    Ok(Html(FavoritesPage::new(user.clone(), recipes)))
}

pub async fn toggle(
    State(ctx): State<AppContext>,
    current: CurrentCaller,
    Path(recipe_id): Path<i32>,
) -> PageResult<Redirect> {
    let user = current.require_user()?;
    let recipe = ctx
        .recipes
        .find_by_id(recipe_id)
        .await
        .map_err(db_error)?
        .ok_or(AppError::NotFound)?;

    let favorited = ctx
        .favorites
        .toggle(user.id, recipe.id, &current.caller.voter)
        .await
        .map_err(db_error)?;
    tracing::debug!("User {} favorite on recipe {}: {}", user.id, recipe.id, favorited);

    Ok(to_recipe(&recipe.slug))
}
