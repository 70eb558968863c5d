//! Public site configuration handler.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::models::SiteConfig;
use crate::state::AppState;

/// Get the SEO site configuration (cache-first, compiled-in defaults when
/// the singleton has never been written).
pub async fn show(State(state): State<AppState>) -> Result<Json<SiteConfig>> {
    Ok(Json(state.site_config().await?))
}
