//! Chart File Serving
//!
//! Exposes the chart output directory under `/charts` so transcript images
//! can reference the visualization artifact.

use crate::config::ChartConfig;
use crate::models::CHARTS_ROUTE;
use axum::Router;
use tower_http::services::ServeDir;
use tracing::{info, warn};

/// Create router for serving rendered charts
pub fn router(charts: &ChartConfig) -> Router {
    let dir = &charts.output_dir;

    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(path = %dir.display(), error = %e, "Chart directory unavailable, images will 404");
    } else {
        info!(path = %dir.display(), "Serving charts");
    }

    Router::new().nest_service(CHARTS_ROUTE, ServeDir::new(dir))
}
