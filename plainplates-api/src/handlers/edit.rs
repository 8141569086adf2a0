use super::to_recipe;
use crate::error::PageResult;
use crate::pages::{EditPage, Html};
use crate::session::CurrentCaller;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Form;
use plainplates_app::domain::RecipeEdit;
use plainplates_app::AppContext;

pub async fn form(
    State(ctx): State<AppContext>,
    current: CurrentCaller,
    Path(slug): Path<String>,
) -> PageResult<Html<EditPage>> {
    let user = current.require_user()?;
    let recipe = ctx.edit_recipe.load(&slug, &current.caller).await?;

    Ok(Html(EditPage::new(
        user.clone(),
        recipe.slug.clone(),
        RecipeEdit::from_detail(&recipe),
        None,
    )))
}

pub async fn save(
    State(ctx): State<AppContext>,
    current: CurrentCaller,
    Path(slug): Path<String>,
    Form(edit): Form<RecipeEdit>,
) -> PageResult<Response> {
    let user = current.require_user()?;

    let result = ctx.edit_recipe.execute(&slug, &current.caller, &edit).await;
    match result {
        Ok(recipe) => Ok(to_recipe(&recipe.slug).into_response()),
        Err(e) if e.is_user_correctable() => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(EditPage::new(
                user.clone(),
                slug,
                edit,
                Some(e.user_message().to_string()),
            )),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
