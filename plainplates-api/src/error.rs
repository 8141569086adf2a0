use crate::pages::{ErrorPage, Html};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use plainplates_errors::AppError;

/// Renders an `AppError` as an HTML page instead of JSON.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, title) = match &self.0 {
            AppError::Unauthenticated => return Redirect::to("/login").into_response(),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "That didn't work"),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "That didn't work"),
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
            }
        };
        (status, Html(ErrorPage::new(title, self.0.user_message()))).into_response()
    }
}

pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    fn status_of(err: AppError) -> StatusCode {
        PageError(err).into_response().status()
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let response = PageError(AppError::Unauthenticated).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(status_of(AppError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::Validation("Title is required".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Upstream("timed out".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::Database("disk full".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_pages_are_html() {
        let response = PageError(AppError::NotFound).into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }
}
