use super::to_recipe;
use crate::error::PageResult;
use crate::pages::{Html, SubmitPage};
use crate::session::CurrentCaller;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Form;
use plainplates_app::AppContext;
use serde::Deserialize;

pub async fn form(current: CurrentCaller) -> PageResult<Html<SubmitPage>> {
    let user = current.require_user()?;
    Ok(Html(SubmitPage::new(user.clone(), None)))
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    recipe_text: String,
}

pub async fn submit(
    State(ctx): State<AppContext>,
    current: CurrentCaller,
    Form(form): Form<SubmitForm>,
) -> PageResult<Response> {
    let user = current.require_user()?;

    let result = match ctx.rate_limiter.check_rate_limit(&user.id.to_string()) {
        Ok(()) => ctx.submit_recipe.execute(&form.recipe_text, user.id).await,
        Err(limited) => {
            tracing::warn!("Submission rate limit hit by {}", user.id);
            Err(limited.into())
        }
    };

    match result {
        Ok(recipe) => Ok(to_recipe(&recipe.slug).into_response()),
        // The form comes back empty; the pasted text is not kept.
        Err(e) if e.is_user_correctable() => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(SubmitPage::new(user.clone(), Some(e.user_message().to_string()))),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
