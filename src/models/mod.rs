//! Core data models for the bookmarks service.
//!
//! `Bookmark` maps to the `bookmarks` table via `sqlx::FromRow` and
//! serializes as JSON via `serde`. The request and input types describe
//! what clients send before and after validation.

pub mod bookmark;
