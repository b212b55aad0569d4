//! API Route Modules
//!
//! Thin HTTP controllers over the composition core. Handlers construct
//! repositories from the shared state, adapt errors to [`AppError`], and
//! contain no composition logic of their own.
//!
//! - [`health`] - liveness check
//! - [`smart_rules`] - smart rule CRUD, execution and preview
//! - [`storefront`] - page hydration endpoints
//! - [`pages`] - page definition creation

pub mod health;
pub mod pages;
pub mod smart_rules;
pub mod storefront;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

use axum::Router;

use crate::core::ServerState;

/// Compose every resource router
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(smart_rules::router())
        .merge(storefront::router())
        .merge(pages::router())
}
