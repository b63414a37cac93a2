//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod friendship;
pub mod health;
pub mod post;
pub mod user;
