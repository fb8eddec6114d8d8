//! Defines routes for the bookmarks API.
//!
//! ## Structure
//! - **Health endpoints** (no auth)
//!   - `GET    /healthz` — liveness
//!   - `GET    /readyz`  — readiness (database reachable)
//!
//! - **Bookmark endpoints** (mounted under `/api`, bearer token required)
//!   - `GET    /api/bookmarks`      — list bookmarks
//!   - `POST   /api/bookmarks`      — create bookmark
//!   - `GET    /api/bookmarks/{id}` — fetch one bookmark
//!   - `PATCH  /api/bookmarks/{id}` — partially update a bookmark
//!   - `DELETE /api/bookmarks/{id}` — delete a bookmark

use crate::{
    handlers::{
        bookmark_handlers::{
            create_bookmark, delete_bookmark, get_bookmark, list_bookmarks, update_bookmark,
        },
        health_handlers::{healthz, readyz},
    },
    middleware::require_bearer_token,
    state::AppState,
};
use axum::{Router, http::StatusCode, middleware, routing::get};

/// The single mount point for every bookmark route.
pub const API_PREFIX: &str = "/api";

/// Build the router for health and bookmark routes.
///
/// The bearer-token gate wraps everything under `/api`, including unmatched
/// paths, and leaves the probes open.
pub fn routes(state: &AppState) -> Router<AppState> {
    let bookmarks = Router::new()
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route(
            "/bookmarks/{id}",
            get(get_bookmark)
                .patch(update_bookmark)
                .delete(delete_bookmark),
        )
        .fallback(api_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token,
        ));

    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest(API_PREFIX, bookmarks)
}

async fn api_not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
