//! Storefront API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tenants/{tenant}/storefront", storefront_routes())
}

fn storefront_routes() -> Router<ServerState> {
    Router::new()
        .route("/pages/{slug}", get(handler::page_by_slug))
        .route("/hydrate", post(handler::hydrate))
}
