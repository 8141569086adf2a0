use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Login required")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("Recipe service failed: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::NotFound => "We couldn't find that recipe.",
            Self::Unauthenticated => "Please log in to continue.",
            Self::Validation(msg) => msg.as_str(),
            Self::Upstream(_) => {
                "We couldn't turn that text into a recipe. Check the formatting and try again."
            }
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                "Something went wrong on our side. Please try again later."
            }
        }
    }

    /// Validation and upstream failures are shown back on the form they came from.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Upstream(_))
    }
}

#[cfg(feature = "ssr")]
mod ssr_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Redirect, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        message: String,
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let (status, message) = match &self {
                AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
                AppError::Unauthenticated => return Redirect::to("/login").into_response(),
                AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
                AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, self.user_message().to_string()),
                AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.user_message().to_string(),
                ),
            };
            (status, Json(ErrorResponse { message })).into_response()
        }
    }
}
