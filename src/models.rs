use crate::agents::ReplyAgent;
use crate::charts::ChartRenderer;
use crate::config::Config;
use crate::session::{Role, SessionState, Turn};
use crate::types::AppResult;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// URL prefix under which the chart directory is served.
pub const CHARTS_ROUTE: &str = "/charts";

/// Shared handler state. The mutex serializes interactions: each action
/// runs to completion before the next one sees the session.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<Mutex<SessionState>>,
    pub agent: ReplyAgent,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let session = SessionState::new(config.llm.clone())?;
        let agent = ReplyAgent::new(ChartRenderer::new(config.charts.artifact_path()));

        Ok(Self {
            config,
            session: Arc::new(Mutex::new(session)),
            agent,
        })
    }
}

/// Public URL for a chart artifact on disk.
pub fn image_url(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| format!("{}/{}", CHARTS_ROUTE, name))
}

// API Request/Response types

#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ChatResponse {
    /// Reply text; on failure this is the error description
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Turn> for ChatResponse {
    fn from(turn: &Turn) -> Self {
        Self {
            text: turn.text.clone(),
            image_url: turn.image_path.as_deref().and_then(image_url),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Turn> for TranscriptEntry {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            text: turn.text.clone(),
            image_url: turn.image_path.as_deref().and_then(image_url),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub configured: bool,
}
