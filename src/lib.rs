// LUNA - single-user educational chatbot backed by Gemini

pub mod config;
pub mod types;
pub mod models;
pub mod session;
pub mod agents;
pub mod llm;
pub mod charts;
pub mod settings;
pub mod views;
pub mod routes;
pub mod middleware;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
