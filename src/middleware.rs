//! Request gates and response rewriting shared by the API routes.
//!
//! - `require_bearer_token` rejects calls without the configured token
//! - `redact_internal_errors` strips 500 details in production

use crate::{
    errors::{AppError, InternalErrorMarker},
    state::AppState,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Reject the request with 401 unless it carries
/// `Authorization: Bearer <api_token>`.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    if presented != Some(state.api_token.as_ref()) {
        tracing::error!("Unauthorized request to path: {}", request.uri().path());
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Replace the body of internal-error responses with a generic message
/// when running in production. The detail has already been logged.
pub async fn redact_internal_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if state.environment.is_production()
        && response.extensions().get::<InternalErrorMarker>().is_some()
    {
        return AppError::generic_internal_response();
    }
    response
}

/// Extract the credential from a `Bearer <token>` header value.
/// The scheme is matched case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
