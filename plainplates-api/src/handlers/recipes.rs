use super::to_recipe;
use crate::error::PageResult;
use crate::pages::{HomePage, Html, ListingPage, RecipePage};
use crate::session::CurrentCaller;
use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Form;
use plainplates_app::domain::{RecipeFilter, SortMode, VoteChoice};
use plainplates_app::infrastructure::db::db_error;
use plainplates_app::AppContext;
use plainplates_errors::AppError;
use serde::Deserialize;

const HOME_LIST_SIZE: u64 = 10;

pub async fn home(State(ctx): State<AppContext>, current: CurrentCaller) -> PageResult<Html<HomePage>> {
    let top = ctx
        .recipes
        .list(&RecipeFilter::top(SortMode::Score, HOME_LIST_SIZE))
        .await
        .map_err(db_error)?;
    let newest = ctx
        .recipes
        .list(&RecipeFilter::top(SortMode::CreatedAt, HOME_LIST_SIZE))
        .await
        .map_err(db_error)?;
    let categories = ctx.categories.list().await.map_err(db_error)?;

    Ok(Html(HomePage::new(
        current.user().cloned(),
        top,
        newest,
        categories,
    )))
}

#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    q: Option<String>,
    category: Option<String>,
    sort: Option<String>,
}

pub async fn list(
    State(ctx): State<AppContext>,
    current: CurrentCaller,
    Query(query): Query<ListingQuery>,
) -> PageResult<Html<ListingPage>> {
    let sort = query
        .sort
        .as_deref()
        .map(SortMode::parse)
        .unwrap_or_default();
    let filter = RecipeFilter::default()
        .with_search(query.q)
        .with_category(query.category)
        .with_sort(sort);

    let recipes = ctx.recipes.list(&filter).await.map_err(db_error)?;
    let categories = ctx.categories.list().await.map_err(db_error)?;
    let selected = match &filter.category_slug {
        Some(slug) => ctx.categories.find_by_slug(slug).await.map_err(db_error)?,
        None => None,
    };

    Ok(Html(ListingPage::new(
        current.user().cloned(),
        recipes,
        categories,
        filter.search,
        selected,
        filter.sort,
    )))
}

pub async fn detail(
    State(ctx): State<AppContext>,
    current: CurrentCaller,
    Path(slug): Path<String>,
) -> PageResult<Html<RecipePage>> {
    let recipe = ctx
        .recipes
        .detail(&slug, &current.caller)
        .await
        .map_err(db_error)?
        .ok_or(AppError::NotFound)?;

    Ok(Html(RecipePage::new(current.user().cloned(), recipe)))
}

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    value: i32,
}

pub async fn vote(
    State(ctx): State<AppContext>,
    current: CurrentCaller,
    Path(recipe_id): Path<i32>,
    Form(form): Form<VoteForm>,
) -> PageResult<Redirect> {
    let choice = VoteChoice::try_from(form.value)?;
    let recipe = ctx
        .recipes
        .find_by_id(recipe_id)
        .await
        .map_err(db_error)?
        .ok_or(AppError::NotFound)?;

    ctx.votes
        .cast(recipe.id, &current.caller.voter, choice)
        .await
        .map_err(db_error)?;

    Ok(to_recipe(&recipe.slug))
}
