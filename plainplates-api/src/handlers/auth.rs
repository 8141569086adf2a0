use crate::error::PageResult;
use crate::pages::{Html, LoginPage};
use crate::session::{CurrentCaller, OAUTH_STATE_KEY, PKCE_VERIFIER_KEY, SESSION_USER_KEY};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use oauth2::PkceCodeVerifier;
use plainplates_app::domain::{SessionUser, User};
use plainplates_app::infrastructure::db::db_error;
use plainplates_app::AppContext;
use plainplates_errors::AppError;
use serde::Deserialize;
use tower_sessions::Session;

fn session_error(e: tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("Session error: {}", e))
}

pub async fn login(current: CurrentCaller) -> Response {
    if current.user().is_some() {
        return Redirect::to("/").into_response();
    }
    Html(LoginPage::new(None)).into_response()
}

pub async fn login_google(
    State(ctx): State<AppContext>,
    session: Session,
) -> PageResult<Redirect> {
    let (auth_url, csrf_token, pkce_verifier) = ctx.google_oauth.get_auth_url();

    session
        .insert(OAUTH_STATE_KEY, csrf_token.secret())
        .await
        .map_err(session_error)?;
    session
        .insert(PKCE_VERIFIER_KEY, pkce_verifier.secret())
        .await
        .map_err(session_error)?;

    Ok(Redirect::to(&auth_url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

pub async fn google_callback(
    State(ctx): State<AppContext>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> PageResult<Response> {
    // Single use, whatever the outcome.
    let stored_state: Option<String> = session
        .remove(OAUTH_STATE_KEY)
        .await
        .map_err(session_error)?;
    let stored_verifier: Option<String> = session
        .remove(PKCE_VERIFIER_KEY)
        .await
        .map_err(session_error)?;

    if let Some(error) = query.error {
        tracing::warn!("Google login refused: {}", error);
        return Ok(login_failed("Google sign-in was cancelled."));
    }

    let (Some(code), Some(state), Some(expected), Some(verifier)) =
        (query.code, query.state, stored_state, stored_verifier)
    else {
        tracing::warn!("Google callback missing code, state or stored verifier");
        return Ok(login_failed("Your login session expired. Please try again."));
    };

    if state != expected {
        tracing::warn!("Google callback state mismatch");
        return Ok(login_failed("Your login session expired. Please try again."));
    }

    let info = match ctx
        .google_oauth
        .exchange_code(&code, PkceCodeVerifier::new(verifier))
        .await
    {
        Ok(info) => info,
        Err(e) => {
            tracing::error!("Google login failed: {}", e);
            return Ok(login_failed("We couldn't sign you in with Google."));
        }
    };

    let saved = ctx.users.upsert(&info.into_user()).await.map_err(db_error)?;
    let user: User = saved.into();
    let session_user = SessionUser::from(&user);

    // New id on privilege change.
    session.cycle_id().await.map_err(session_error)?;
    session
        .insert(SESSION_USER_KEY, &session_user)
        .await
        .map_err(session_error)?;

    tracing::info!("User {} logged in", session_user.email);
    Ok(Redirect::to("/").into_response())
}

fn login_failed(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Html(LoginPage::new(Some(message.to_string()))),
    )
        .into_response()
}

pub async fn logout(session: Session) -> PageResult<Redirect> {
    session.flush().await.map_err(session_error)?;
    Ok(Redirect::to("/"))
}

/// Always answers; an unreadable session counts as logged out.
pub async fn whoami(session: Session) -> Json<serde_json::Value> {
    let user: Option<SessionUser> = match session.get(SESSION_USER_KEY).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("whoami could not read session: {}", e);
            None
        }
    };

    Json(match user {
        Some(user) => serde_json::json!({
            "logged_in": true,
            "email": user.email,
            "name": user.name,
        }),
        None => serde_json::json!({ "logged_in": false }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::session::{Id, Record};
    use tower_sessions::{session_store, SessionStore};

    #[derive(Debug, Clone)]
    struct OfflineStore;

    #[async_trait::async_trait]
    impl SessionStore for OfflineStore {
        async fn save(&self, _record: &Record) -> session_store::Result<()> {
            Err(session_store::Error::Backend("store offline".to_string()))
        }

        async fn load(&self, _session_id: &Id) -> session_store::Result<Option<Record>> {
            Err(session_store::Error::Backend("store offline".to_string()))
        }

        async fn delete(&self, _session_id: &Id) -> session_store::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_whoami_treats_unreadable_session_as_logged_out() {
        let session = Session::new(Some(Id::default()), Arc::new(OfflineStore), None);
        let Json(body) = whoami(session).await;
        assert_eq!(body, serde_json::json!({ "logged_in": false }));
    }
}
