//! HTML to PDF Server Library
//!
//! Converts HTML documents to PDF by running wkhtmltopdf as a subprocess.
//! The server binary is in main.rs; the router is exposed here so it can be
//! exercised in tests.
//!
//! # Modules
//!
//! - `options`: layout options, margin normalization and layering
//! - `request`: raw vs JSON request bodies
//! - `renderer`: the wkhtmltopdf invoker
//! - `routes`: HTTP endpoints

pub mod config;
pub mod error;
pub mod options;
pub mod renderer;
pub mod request;
pub mod routes;
pub mod state;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router with middleware and state attached
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .layer(DefaultBodyLimit::max(state.config().server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
