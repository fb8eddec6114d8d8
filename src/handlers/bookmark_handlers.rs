//! HTTP handlers for bookmark operations.
//!
//! Each handler validates its input before touching the service and passes
//! every bookmark it returns through the sanitizer.

use crate::{
    errors::AppError,
    models::bookmark::{Bookmark, CreateBookmarkRequest, UpdateBookmarkRequest},
    services::{
        sanitize::sanitize,
        validation::{validate_create, validate_update},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};

/// `GET /bookmarks`
pub async fn list_bookmarks(
    State(state): State<AppState>,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let bookmarks = state.bookmarks.list().await?;
    Ok(Json(bookmarks.into_iter().map(sanitize).collect()))
}

/// `GET /bookmarks/{id}`
pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Bookmark>, AppError> {
    let bookmark = state.bookmarks.get_by_id(&id).await?;
    Ok(Json(sanitize(bookmark)))
}

/// `POST /bookmarks` — responds 201 with the stored bookmark and a
/// `Location` pointing at it.
pub async fn create_bookmark(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookmarkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(malformed_body)?;
    let new = validate_create(request)?;

    let bookmark = state.bookmarks.create(new).await?;
    tracing::info!("Bookmark with id {} created", bookmark.id);

    let location = format!("/bookmarks/{}", bookmark.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(sanitize(bookmark)),
    ))
}

/// `PATCH /bookmarks/{id}` — partial update, 204 on success.
pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBookmarkRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = payload.map_err(malformed_body)?;
    let patch = validate_update(request)?;

    state.bookmarks.update(&id, patch).await?;
    tracing::info!("Bookmark with id {} updated", id);
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /bookmarks/{id}` — 204 on success.
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.bookmarks.delete(&id).await?;
    tracing::info!("Bookmark with id {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

fn malformed_body(rejection: JsonRejection) -> AppError {
    AppError::MalformedBody(rejection.body_text())
}
