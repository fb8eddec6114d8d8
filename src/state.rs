use crate::{config::Environment, services::bookmark_service::BookmarkService};
use std::sync::Arc;

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub bookmarks: BookmarkService,
    /// Secret clients must send as `Authorization: Bearer <token>`.
    pub api_token: Arc<str>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(bookmarks: BookmarkService, api_token: &str, environment: Environment) -> Self {
        Self {
            bookmarks,
            api_token: Arc::from(api_token),
            environment,
        }
    }
}
