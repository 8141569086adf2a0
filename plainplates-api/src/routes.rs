use crate::handlers::{auth, edit, favorites, recipes, submit};
use axum::routing::{get, post};
use axum::Router;
use plainplates_app::AppContext;

/// Every page and form endpoint. Session, trace and compression layers are
/// added by the caller.
pub fn router() -> Router<AppContext> {
    Router::new()
        .route("/", get(recipes::home))
        .route("/recipes", get(recipes::list))
        .route("/recipes/{recipe}", get(recipes::detail))
        .route("/recipes/{recipe}/vote", post(recipes::vote))
        .route("/recipes/{recipe}/edit", get(edit::form).post(edit::save))
        .route("/favorites", get(favorites::list))
        .route("/favorites/{recipe_id}", post(favorites::toggle))
        .route("/submit", get(submit::form).post(submit::submit))
        .route("/login", get(auth::login))
        .route("/login/google", get(auth::login_google))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/logout", get(auth::logout))
        .route("/whoami", get(auth::whoami))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SESSION_USER_KEY;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use plainplates_app::domain::{RecipeFields, SessionUser, User};
    use plainplates_app::infrastructure::db::entities::recipe;
    use plainplates_app::infrastructure::db::run_migrations;
    use plainplates_app::Config;
    use sea_orm::{ConnectOptions, Database};
    use std::sync::Arc;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

    struct TestApp {
        ctx: AppContext,
        store: MemoryStore,
    }

    async fn test_app() -> TestApp {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        run_migrations(&db).await.unwrap();

        let config = Config::from_lookup(|key| match key {
            "GOOGLE_CLIENT_ID" | "GOOGLE_CLIENT_SECRET" | "MISTRAL_API_KEY" => {
                Some("test".to_string())
            }
            // Nothing listens here, so structuring fails straight away.
            "MISTRAL_API_URL" => Some("http://127.0.0.1:9/v1/chat/completions".to_string()),
            _ => None,
        })
        .unwrap();

        TestApp {
            ctx: AppContext::with_connection(db, config).unwrap(),
            store: MemoryStore::default(),
        }
    }

    impl TestApp {
        async fn send(&self, request: Request<Body>) -> Response {
            router()
                .layer(SessionManagerLayer::new(self.store.clone()))
                .with_state(self.ctx.clone())
                .oneshot(request)
                .await
                .unwrap()
        }

        async fn user(&self, email: &str) -> SessionUser {
            let saved = self
                .ctx
                .users
                .upsert(&User::new(email.to_string(), "Cook".to_string(), None))
                .await
                .unwrap();
            SessionUser::from(&User::from(saved))
        }

        /// A session cookie for `user`, stored the way the login callback stores it.
        async fn cookie_for(&self, user: &SessionUser) -> String {
            let session = Session::new(None, Arc::new(self.store.clone()), None);
            session.insert(SESSION_USER_KEY, user).await.unwrap();
            session.save().await.unwrap();
            format!("id={}", session.id().unwrap())
        }

        async fn recipe(&self, title: &str, owner: Option<&SessionUser>) -> recipe::Model {
            let fields = RecipeFields {
                title: title.to_string(),
                description: "Something good.".to_string(),
                ingredients: "- 1 egg".to_string(),
                instructions: "1. Cook the egg.".to_string(),
                notes: None,
                prep_time: 5,
                cook_time: 5,
                servings: 1,
            };
            self.ctx
                .recipes
                .create(&fields, owner.map(|u| u.id))
                .await
                .unwrap()
        }
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_member_pages_send_anonymous_callers_to_login() {
        let app = test_app().await;
        let recipe = app.recipe("Omelette", None).await;

        let requests = vec![
            get("/favorites", None),
            post_form(&format!("/favorites/{}", recipe.id), "", None),
            get("/submit", None),
            post_form("/submit", "recipe_text=Boil+an+egg", None),
            get(&format!("/recipes/{}/edit", recipe.slug), None),
        ];
        for request in requests {
            let uri = request.uri().to_string();
            let response = app.send(request).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
            assert_eq!(location(&response), "/login", "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_recipe_is_not_found() {
        let app = test_app().await;

        let response = app.send(get("/recipes/no-such-dish", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Not found"));

        let response = app.send(post_form("/recipes/999/vote", "value=1", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_detail_renders_for_anonymous_callers() {
        let app = test_app().await;
        let recipe = app.recipe("Tom & Jerry's Toast", None).await;

        let response = app.send(get(&format!("/recipes/{}", recipe.slug), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        let html = body_text(response).await;
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(!html.contains("/edit"));
    }

    #[tokio::test]
    async fn test_vote_value_must_be_one_or_minus_one() {
        let app = test_app().await;
        let recipe = app.recipe("Pancakes", None).await;
        let uri = format!("/recipes/{}/vote", recipe.id);

        let response = app.send(post_form(&uri, "value=0", None)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app.send(post_form(&uri, "value=1", None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/recipes/{}", recipe.slug));
    }

    #[tokio::test]
    async fn test_only_the_owner_can_open_the_edit_form() {
        let app = test_app().await;
        let owner = app.user("owner@example.com").await;
        let other = app.user("other@example.com").await;
        let recipe = app.recipe("Owner's Stew", Some(&owner)).await;
        let uri = format!("/recipes/{}/edit", recipe.slug);

        let other_cookie = app.cookie_for(&other).await;
        let response = app.send(get(&uri, Some(&other_cookie))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let takeover = "title=Mine+now&description=Mine&ingredients=-+salt\
            &instructions=1.+Salt+it.&prep_time=1&cook_time=1&servings=1";
        let response = app
            .send(post_form(&uri, takeover, Some(&other_cookie)))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let owner_cookie = app.cookie_for(&owner).await;
        let response = app.send(get(&uri, Some(&owner_cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"<input name="title""#));
        assert!(!html.contains("Mine now"));
    }

    #[tokio::test]
    async fn test_favorite_toggle_redirects_back_to_recipe() {
        let app = test_app().await;
        let user = app.user("fan@example.com").await;
        let recipe = app.recipe("Shortbread", None).await;
        let cookie = app.cookie_for(&user).await;

        let response = app
            .send(post_form(&format!("/favorites/{}", recipe.id), "", Some(&cookie)))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/recipes/shortbread");

        let response = app.send(get("/favorites", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Shortbread"));
    }

    #[tokio::test]
    async fn test_failed_submission_does_not_echo_pasted_text() {
        let app = test_app().await;
        let user = app.user("cook@example.com").await;
        let cookie = app.cookie_for(&user).await;

        let response = app
            .send(post_form(
                "/submit",
                "recipe_text=Grandmas+secret+marmalade",
                Some(&cookie),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("turn that text into a recipe"));
        assert!(!html.contains("secret marmalade"));
        assert_eq!(app.ctx.recipes.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_whoami_reports_login_state() {
        let app = test_app().await;

        let response = app.send(get("/whoami", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json, serde_json::json!({ "logged_in": false }));

        let user = app.user("me@example.com").await;
        let cookie = app.cookie_for(&user).await;
        let response = app.send(get("/whoami", Some(&cookie))).await;
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["logged_in"], true);
        assert_eq!(json["email"], "me@example.com");
    }
}
