//! HTTP Routes
//!
//! - `/`, `/chatbot`, `/analytics`, `/settings` - the four pages
//! - `/api/chat` - Chat endpoint (JSON) and transcript
//! - `/api/analytics` - Message counts
//! - `/api/settings` - Credential status and update
//! - `/api/health` - Health check
//! - `/charts` - Rendered chart files

pub mod chat;
pub mod health;
pub mod static_files;
pub mod ui;

use axum::Router;
use crate::middleware::apply_cors;
use crate::models::AppState;
use crate::settings;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let charts = static_files::router(&state.config.charts);
    let origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(ui::router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(settings::router(state.clone()))
        .merge(health::router(state))
        .merge(charts)
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChartConfig, Config, LLMConfig, ServerConfig, DEFAULT_GEMINI_API_BASE};
    use crate::types::NOT_CONFIGURED_MESSAGE;
    use crate::views::EMPTY_ANALYTICS_MESSAGE;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(dir: &TempDir, api_key: Option<&str>) -> AppState {
        test_state_at(dir, api_key, DEFAULT_GEMINI_API_BASE)
    }

    fn test_state_at(dir: &TempDir, api_key: Option<&str>, api_base: &str) -> AppState {
        let config = Config {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                cors_allowed_origins: vec!["*".to_string()],
            },
            llm: LLMConfig {
                gemini_api_key: api_key.map(str::to_string),
                api_base: api_base.to_string(),
                ..LLMConfig::default()
            },
            charts: ChartConfig {
                output_dir: dir.path().join("charts"),
            },
        };
        AppState::new(config).unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_all_pages_render() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir, None));

        for path in ["/", "/chatbot", "/analytics", "/settings"] {
            let response = app
                .clone()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", path);
            assert!(body_string(response).await.contains("Navigation"));
        }
    }

    #[tokio::test]
    async fn test_chat_without_key_records_not_configured() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, None);
        let app = create_router(state.clone());

        let response = app.clone().oneshot(form("/chatbot", "message=hello")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let page = app
            .oneshot(Request::get("/chatbot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(page).await;
        assert!(html.contains("hello"));
        assert!(html.contains(NOT_CONFIGURED_MESSAGE));
        assert_eq!(state.session.lock().await.counts().total, 2);
    }

    #[tokio::test]
    async fn test_blank_message_is_ignored() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, None);
        let app = create_router(state.clone());

        let response = app.oneshot(form("/chatbot", "message=+++")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.session.lock().await.turns().is_empty());
    }

    #[tokio::test]
    async fn test_analytics_placeholder_then_chart() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, None);
        let app = create_router(state.clone());

        let empty = app
            .clone()
            .oneshot(Request::get("/analytics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(body_string(empty).await.contains(EMPTY_ANALYTICS_MESSAGE));

        app.clone().oneshot(form("/chatbot", "message=hello")).await.unwrap();

        let filled = app
            .oneshot(Request::get("/analytics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(filled).await;
        assert!(html.contains("Total Messages"));
        assert!(html.contains("<svg"));
    }

    #[tokio::test]
    async fn test_settings_save_updates_credential() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, None);
        let app = create_router(state.clone());

        let response = app
            .clone()
            .oneshot(form("/settings", "api_key=abc123456"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/settings?saved=true"
        );

        {
            let session = state.session.lock().await;
            assert_eq!(session.credentials().get(), Some("abc123456"));
            assert!(session.client().is_some());
        }

        let page = app
            .oneshot(Request::get("/settings?saved=true").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(page).await;
        assert!(html.contains("API Key updated successfully!"));
        assert!(html.contains("••••3456"));
        assert!(!html.contains("abc123456"));
    }

    #[tokio::test]
    async fn test_api_chat_rejects_empty_message() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir, None));

        let request = Request::post("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message": "   "}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_chat_and_analytics() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir, None));

        let request = Request::post("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message": "hello"}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["text"], NOT_CONFIGURED_MESSAGE);
        assert!(json.get("image_url").is_none());

        let response = app
            .oneshot(Request::get("/api/analytics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json, serde_json::json!({"total": 2, "user": 1, "assistant": 1}));
    }

    #[tokio::test]
    async fn test_api_settings_roundtrip() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir, Some("env-key-0000")));

        let response = app
            .clone()
            .oneshot(Request::get("/api/settings").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["has_key"], true);
        assert_eq!(json["key_hint"], "••••0000");

        let request = Request::post("/api/settings")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"api_key": ""}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["settings"]["has_key"], false);
    }

    fn gemini_ok(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 6, "totalTokenCount": 10}
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_unconfigured_then_saved_key_scenario() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_header("x-goog-api-key", "abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(gemini_ok("Growth often follows a quadratic curve."))
            .expect(1)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let state = test_state_at(&dir, None, &server.url());
        let app = create_router(state.clone());

        let hello = Request::post("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message": "hello"}"#))
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&body_string(app.clone().oneshot(hello).await.unwrap()).await).unwrap();
        assert_eq!(json["text"], NOT_CONFIGURED_MESSAGE);
        assert!(json.get("image_url").is_none());

        // An earlier key must not leak into later calls.
        app.clone().oneshot(form("/settings", "api_key=old-key")).await.unwrap();
        app.clone().oneshot(form("/settings", "api_key=abc123")).await.unwrap();

        let visualize = Request::post("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message": "please visualize growth"}"#))
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&body_string(app.clone().oneshot(visualize).await.unwrap()).await).unwrap();

        mock.assert_async().await;
        assert_eq!(json["text"], "Growth often follows a quadratic curve.");
        assert_eq!(json["image_url"], "/charts/visualization.svg");
        assert!(dir.path().join("charts/visualization.svg").is_file());

        let chart = app
            .oneshot(Request::get("/charts/visualization.svg").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(chart.status(), StatusCode::OK);

        let session = state.session.lock().await;
        assert_eq!(session.counts().total, 4);
        assert!(session.turns()[3].image_path.is_some());
    }

    #[tokio::test]
    async fn test_api_failure_shown_as_reply() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let state = test_state_at(&dir, None, &server.url());
        let app = create_router(state);

        app.clone().oneshot(form("/settings", "api_key=abc123")).await.unwrap();
        app.clone().oneshot(form("/chatbot", "message=please+visualize+growth")).await.unwrap();

        let page = app
            .oneshot(Request::get("/chatbot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(page).await;
        assert!(html.contains("Resource has been exhausted"));
        assert!(!html.contains("<img"));
        assert!(!dir.path().join("charts/visualization.svg").exists());
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir, None));

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["configured"], false);
    }
}
