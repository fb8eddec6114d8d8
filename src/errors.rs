use crate::services::{bookmark_service::ServiceError, validation::ValidationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Body message for 500s when running in production.
pub const GENERIC_SERVER_ERROR: &str = "server error";

/// Errors that reach the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized request")]
    Unauthorized,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    MalformedBody(String),
    #[error("Bookmark Not Found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Attached to 500 responses so the redaction middleware can swap the
/// detailed body for a generic one in production.
#[derive(Clone, Copy, Debug)]
pub struct InternalErrorMarker;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The response sent in place of any internal error when details must
    /// stay private.
    pub fn generic_internal_response() -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": GENERIC_SERVER_ERROR } })),
        )
            .into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => AppError::NotFound,
            ServiceError::Sqlx(err) => AppError::Internal(err.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Unauthorized => {
                (status, Json(json!({ "error": "Unauthorized request" }))).into_response()
            }
            AppError::Internal(err) => {
                let detail = format!("{:#}", err);
                tracing::error!(error = %detail, "internal error");
                let mut response =
                    (status, Json(json!({ "error": { "message": detail } }))).into_response();
                response.extensions_mut().insert(InternalErrorMarker);
                response
            }
            other => {
                let message = other.to_string();
                tracing::warn!(status = status.as_u16(), "{}", message);
                (status, Json(json!({ "error": { "message": message } }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_errors_are_400_with_message_envelope() {
        let response = AppError::from(ValidationError::MissingField("url")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": { "message": "'url' is required" } })
        );
    }

    #[tokio::test]
    async fn not_found_hides_the_id() {
        let response =
            AppError::from(ServiceError::NotFound("abc".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": { "message": "Bookmark Not Found" } })
        );
    }

    #[tokio::test]
    async fn unauthorized_uses_a_flat_error_string() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Unauthorized request" })
        );
    }

    #[tokio::test]
    async fn internal_errors_carry_detail_and_marker() {
        let err = anyhow::anyhow!("disk on fire").context("writing bookmark");
        let response = AppError::Internal(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<InternalErrorMarker>().is_some());
        assert_eq!(
            body_json(response).await,
            json!({ "error": { "message": "writing bookmark: disk on fire" } })
        );
    }
}
