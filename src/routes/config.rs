//! Default options API
//!
//! - `GET /config` returns the options every render starts from
//! - `POST /config` replaces them; omitted fields fall back to built-in defaults

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::options::{OptionsPatch, PdfOptions};
use crate::state::AppState;

/// Create the config router
pub fn router() -> Router<AppState> {
    Router::new().route("/config", get(get_config).post(replace_config))
}

/// Current default options
async fn get_config(State(state): State<AppState>) -> Json<PdfOptions> {
    Json(state.defaults().await)
}

/// Replace the default options
async fn replace_config(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OptionsPatch>, JsonRejection>,
) -> Result<Json<PdfOptions>> {
    let Json(patch) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    // Validate fully before taking the write lock
    let options = PdfOptions::default().apply(&patch)?;
    state.replace_defaults(options.clone()).await;

    tracing::info!(
        "Default options replaced: page_size={} orientation={} margins={}/{}/{}/{}",
        options.page_size,
        options.orientation,
        options.margin_top,
        options.margin_bottom,
        options.margin_left,
        options.margin_right
    );

    Ok(Json(options))
}
