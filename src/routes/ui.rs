//! Page routes: Home, Chatbot, Analytics, Settings.
//!
//! View selection is stateless. POST handlers follow post/redirect/get so a
//! reload never resubmits a message or a key.

use crate::charts::message_bar_chart_svg;
use crate::models::AppState;
use crate::views::{self, View};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tracing::{error, info, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(View::Home.path(), get(home))
        .route(View::Chatbot.path(), get(chatbot).post(submit_message))
        .route(View::Analytics.path(), get(analytics))
        .route(View::Settings.path(), get(settings).post(save_settings))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsQuery {
    #[serde(default)]
    pub saved: bool,
}

async fn home() -> Html<String> {
    Html(views::home_page())
}

async fn chatbot(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    Html(views::chatbot_page(session.turns()))
}

async fn submit_message(
    State(state): State<AppState>,
    Form(form): Form<MessageForm>,
) -> Redirect {
    let message = form.message.trim();
    if message.is_empty() {
        return Redirect::to(View::Chatbot.path());
    }

    info!(message_len = message.len(), "Received chat message");
    let mut session = state.session.lock().await;
    let turn = state.agent.respond(&mut session, message).await;
    info!(has_image = turn.image_path.is_some(), "Reply recorded");

    Redirect::to(View::Chatbot.path())
}

async fn analytics(State(state): State<AppState>) -> Html<String> {
    let counts = state.session.lock().await.counts();

    if counts.total == 0 {
        return Html(views::analytics_page(&counts, None));
    }

    let chart = match message_bar_chart_svg(&counts) {
        Ok(svg) => Some(svg),
        Err(e) => {
            warn!(error = %e, "Analytics chart unavailable");
            None
        }
    };

    Html(views::analytics_page(&counts, chart.as_deref()))
}

async fn settings(
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> Html<String> {
    let status = state.session.lock().await.credentials().status();
    Html(views::settings_page(&status, query.saved))
}

async fn save_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let mut session = state.session.lock().await;

    match session.set_credential(form.api_key) {
        Ok(()) => Redirect::to("/settings?saved=true").into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update credential");
            e.into_response()
        }
    }
}
