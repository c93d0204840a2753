//! Session state for the single interactive chat session.
//!
//! The session owns the transcript, the credential and the client derived
//! from it. It lives as long as the process; nothing is persisted.

use crate::config::LLMConfig;
use crate::llm::LLM;
use crate::settings::CredentialStore;
use crate::types::AppResult;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "LUNA",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub image_path: Option<PathBuf>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image_path: None,
        }
    }

    pub fn assistant(text: impl Into<String>, image_path: Option<PathBuf>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            image_path,
        }
    }
}

/// Message counts shown on the analytics dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageCounts {
    pub total: usize,
    pub user: usize,
    pub assistant: usize,
}

impl MessageCounts {
    pub fn from_turns(turns: &[Turn]) -> Self {
        turns.iter().fold(Self::default(), |mut counts, turn| {
            counts.total += 1;
            match turn.role {
                Role::User => counts.user += 1,
                Role::Assistant => counts.assistant += 1,
            }
            counts
        })
    }
}

pub struct SessionState {
    turns: Vec<Turn>,
    credentials: CredentialStore,
    client: Option<LLM>,
    llm_config: LLMConfig,
}

impl SessionState {
    /// Start a session with the credential taken from configuration.
    pub fn new(llm_config: LLMConfig) -> AppResult<Self> {
        let credentials = CredentialStore::new(llm_config.gemini_api_key.clone());
        let client = LLM::configure(credentials.get(), &llm_config)?;
        info!(configured = credentials.is_configured(), "Session started");

        Ok(Self {
            turns: Vec::new(),
            credentials,
            client,
            llm_config,
        })
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns are append-only.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn counts(&self) -> MessageCounts {
        MessageCounts::from_turns(&self.turns)
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn client(&self) -> Option<&LLM> {
        self.client.as_ref()
    }

    /// Replace the credential and re-derive the client from it.
    pub fn set_credential(&mut self, value: impl Into<String>) -> AppResult<()> {
        let mut credentials = self.credentials.clone();
        credentials.set(value);
        let client = LLM::configure(credentials.get(), &self.llm_config)?;

        self.credentials = credentials;
        self.client = client;
        info!(configured = self.credentials.is_configured(), "Credential updated");
        Ok(())
    }

    /// Install a prebuilt client, bypassing credential derivation.
    pub fn set_client(&mut self, credential: impl Into<String>, client: LLM) {
        self.credentials.set(credential);
        self.client = Some(client);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_session() -> SessionState {
        SessionState::new(LLMConfig::default()).unwrap()
    }

    #[test]
    fn test_new_session_without_key() {
        let session = empty_session();
        assert!(session.turns().is_empty());
        assert!(session.credentials().get().is_none());
        assert!(session.client().is_none());
    }

    #[test]
    fn test_new_session_uses_configured_key() {
        let config = LLMConfig {
            gemini_api_key: Some("from-env".to_string()),
            ..LLMConfig::default()
        };
        let session = SessionState::new(config).unwrap();
        assert_eq!(session.credentials().get(), Some("from-env"));
        assert!(session.client().is_some());
    }

    #[test]
    fn test_set_credential_rederives_client() {
        let mut session = empty_session();

        session.set_credential("abc123").unwrap();
        assert_eq!(session.credentials().get(), Some("abc123"));
        assert!(session.client().is_some());

        session.set_credential("").unwrap();
        assert!(session.credentials().get().is_none());
        assert!(session.client().is_none());
    }

    #[test]
    fn test_counts_balanced_exchanges() {
        let mut session = empty_session();
        let n = 4;
        for i in 0..n {
            session.push_turn(Turn::user(format!("question {}", i)));
            session.push_turn(Turn::assistant(format!("answer {}", i), None));
        }

        assert_eq!(
            session.counts(),
            MessageCounts {
                total: 2 * n,
                user: n,
                assistant: n
            }
        );
    }

    #[test]
    fn test_counts_empty() {
        assert_eq!(MessageCounts::from_turns(&[]), MessageCounts::default());
    }

    #[test]
    fn test_turn_order_preserved() {
        let mut session = empty_session();
        session.push_turn(Turn::user("first"));
        session.push_turn(Turn::assistant("second", Some(PathBuf::from("charts/visualization.svg"))));

        let turns = session.turns();
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].text, "second");
        assert_eq!(turns[1].image_path, Some(PathBuf::from("charts/visualization.svg")));
    }
}
