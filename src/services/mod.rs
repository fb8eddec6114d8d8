//! Bookmark business logic: input validation, output sanitization and the
//! database-backed service that sits between them.

pub mod bookmark_service;
pub mod sanitize;
pub mod validation;
