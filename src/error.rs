use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::catalog::CatalogError;
use crate::services::recommendations::RecommendationError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Recommendation(#[from] RecommendationError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Catalog rejected the request ({status}): {message}")]
    CatalogRejected { status: StatusCode, message: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Keeps a catalog 4xx status for routes that proxy the catalog as-is
    ///
    /// Other routes report every catalog failure as 500.
    pub fn catalog_passthrough(err: CatalogError) -> Self {
        match err {
            CatalogError::Status { status, message } if (400..500).contains(&status) => {
                match StatusCode::from_u16(status) {
                    Ok(status) => AppError::CatalogRejected { status, message },
                    Err(_) => AppError::Catalog(CatalogError::Status { status, message }),
                }
            }
            other => AppError::Catalog(other),
        }
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::CatalogRejected { status, message } => (*status, message.clone()),
            AppError::Catalog(err @ CatalogError::NotConfigured) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::Catalog(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Movie catalog request failed".to_string(),
            ),
            AppError::Recommendation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not generate recommendations right now".to_string(),
            ),
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
            // Error internals are only exposed by debug builds
            if cfg!(debug_assertions) {
                json!({ "message": message, "detail": self.to_string() })
            } else {
                json!({ "message": message })
            }
        } else {
            json!({ "message": message })
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_status() {
        let cases = [
            (AppError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("no token".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("not yours".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("missing".into()), StatusCode::NOT_FOUND),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_catalog_passthrough_keeps_client_status() {
        let error = AppError::catalog_passthrough(CatalogError::Status {
            status: 404,
            message: "The resource you requested could not be found.".to_string(),
        });
        let (status, message) = error.status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(message.contains("could not be found"));
    }

    #[test]
    fn test_catalog_passthrough_leaves_server_errors_internal() {
        let error = AppError::catalog_passthrough(CatalogError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_catalog_auth_failure_is_not_the_callers_401() {
        let error = AppError::from(CatalogError::Status {
            status: 401,
            message: "Invalid API key: You must be granted a valid key.".to_string(),
        });
        let (status, message) = error.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Movie catalog request failed");
    }

    #[test]
    fn test_catalog_server_failure_is_internal() {
        let error = AppError::Catalog(CatalogError::Status {
            status: 503,
            message: "down".to_string(),
        });
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_catalog_credentials_is_internal() {
        let error = AppError::Catalog(CatalogError::NotConfigured);
        let (status, message) = error.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.contains("TMDB_ACCESS_TOKEN"));
    }
}
