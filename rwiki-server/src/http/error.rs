//! Handler error type rendered as French HTML error pages.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::db::DbError;
use crate::views;

/// Error type for HTML page handlers.
#[derive(Debug)]
pub enum PageError {
    /// Unknown resource (404)
    NotFound,

    /// Database error (500, logged)
    Database(DbError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Html(views::layout::not_found_page().into_string()),
            )
                .into_response(),
            Self::Database(e) => {
                tracing::error!("database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::layout::server_error_page().into_string()),
                )
                    .into_response()
            }
        }
    }
}

impl From<DbError> for PageError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}

/// 429 page for throttled clients.
pub fn too_many_requests() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Html(views::layout::rate_limited_page().into_string()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_found_is_404() {
        let response = PageError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn database_error_is_500() {
        let err = PageError::Database(DbError::Sqlx(sqlx::Error::RowNotFound));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn throttled_is_429() {
        assert_eq!(too_many_requests().status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
