//! Reply Agent
//!
//! Turns one user utterance into a reply: asks the model, then attaches the
//! sample chart when the utterance asks for a visualization.

use crate::charts::{sample_dataset, ChartRenderer};
use crate::session::{SessionState, Turn};
use crate::types::{AppError, AppResult};
use std::path::PathBuf;
use tracing::{info, warn};

const VISUALIZATION_TRIGGER: &str = "visualize";

/// Result of a processed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub image_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ReplyAgent {
    charts: ChartRenderer,
}

impl ReplyAgent {
    pub fn new(charts: ChartRenderer) -> Self {
        Self { charts }
    }

    /// Case-insensitive substring match on the user's text.
    pub fn wants_visualization(user_text: &str) -> bool {
        user_text.to_lowercase().contains(VISUALIZATION_TRIGGER)
    }

    /// Produce a reply without touching the transcript.
    pub async fn process(&self, session: &SessionState, user_text: &str) -> AppResult<Reply> {
        let client = match (session.credentials().get(), session.client()) {
            (Some(_), Some(client)) => client,
            _ => return Err(AppError::NotConfigured),
        };

        let text = client.generate(user_text).await?;

        if !Self::wants_visualization(user_text) {
            return Ok(Reply {
                text,
                image_path: None,
            });
        }

        let image_path = self.charts.render(&sample_dataset())?;
        info!(path = %image_path.display(), "Attached visualization to reply");

        Ok(Reply {
            text,
            image_path: Some(image_path),
        })
    }

    /// Chatbot flow: record the user turn, process it, record the reply.
    /// Failures become the assistant's text so the session carries on.
    pub async fn respond(&self, session: &mut SessionState, user_text: &str) -> Turn {
        session.push_turn(Turn::user(user_text));

        let turn = match self.process(session, user_text).await {
            Ok(reply) => Turn::assistant(reply.text, reply.image_path),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Turn failed");
                Turn::assistant(e.to_string(), None)
            }
        };

        session.push_turn(turn.clone());
        turn
    }
}
