//! Route modules for the HTML to PDF server

pub mod config;
pub mod convert;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All API routes, without middleware
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(convert::router())
        .merge(config::router())
        .merge(health::router())
}
