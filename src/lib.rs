//! SideBoard: REST backend for a marketplace of merchants, items and customers.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use auth::{Authenticator, Claims};
pub use config::{AppConfig, AuthConfig, AuthKey};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use response::{success, Success};
pub use routes::{common_routes, resource_routes};
pub use state::AppState;
pub use store::{connect, ensure_database_exists};

use axum::Router;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Default request body limit in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// The full HTTP surface: common routes, resource routes, OpenAPI document and a 404 fallback.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(resource_routes(state))
        .merge(openapi::openapi_routes())
        .fallback(error::route_not_found)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
