pub mod bookmark_handlers;
pub mod health_handlers;
