//! Represents a bookmark and the request bodies that create or modify one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored bookmark.
///
/// This is also the wire representation returned to clients, after the
/// free-text fields have been passed through the sanitizer.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq, Eq)]
pub struct Bookmark {
    /// Server-generated identifier, immutable for the lifetime of the row.
    pub id: Uuid,

    /// Human-readable title. Never empty for rows written through the API.
    pub title: String,

    /// Target address. Stored as given, not parsed.
    pub url: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Rating between 0 and 5 inclusive.
    pub rating: i64,
}

/// A fully validated bookmark ready to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub rating: i64,
}

/// A validated partial update. At least one field is always set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i64>,
}

impl BookmarkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.rating.is_none()
    }
}

/// Raw body for `POST /bookmarks`.
///
/// Every field is optional here so that missing fields can be reported by
/// name. `rating` stays a raw JSON value so numeric strings can be coerced.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<Value>,
}

/// Raw body for `PATCH /bookmarks/{id}`. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookmarkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<Value>,
}
