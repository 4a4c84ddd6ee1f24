//! HTTP routing for the screenshot endpoint.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::error::ApiError;
use crate::pipeline;
use crate::state::AppState;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/png", get(png)).with_state(state)
}

/// `GET /png` — serve a cached screenshot, or render and store a fresh one.
async fn png(
    State(state): State<Arc<AppState>>, Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = pipeline::screenshot(&state, &query).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}
