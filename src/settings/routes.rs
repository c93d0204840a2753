//! Settings API Routes
//!
//! - GET /api/settings - Current credential status (masked)
//! - POST /api/settings - Replace the credential and re-derive the client

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use super::UpdateSettingsRequest;
use crate::models::AppState;
use crate::views::SETTINGS_SAVED_MESSAGE;
use tracing::{error, info};

/// Create the settings router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/settings", get(get_settings).post(update_settings))
        .with_state(state)
}

/// GET /api/settings - Get current settings
async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.session.lock().await.credentials().status();
    (StatusCode::OK, Json(status))
}

/// POST /api/settings - Update settings
async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    let mut session = state.session.lock().await;

    match session.set_credential(request.api_key) {
        Ok(()) => {
            info!("Settings updated successfully");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": true,
                    "message": SETTINGS_SAVED_MESSAGE,
                    "settings": session.credentials().status()
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to save settings: {}", e);
            e.into_response()
        }
    }
}
