//! Settings Module
//!
//! Holds the session credential (the Gemini API key) and the view models the
//! Settings page and `/api/settings` expose. The key itself is never echoed
//! back; only a masked hint leaves the process.

pub mod routes;

pub use routes::router;

use serde::{Deserialize, Serialize};

/// Single API key for the session. Blank values are treated as absent.
#[derive(Clone, Default)]
pub struct CredentialStore {
    api_key: Option<String>,
}

impl CredentialStore {
    pub fn new(initial: Option<String>) -> Self {
        let mut store = Self::default();
        store.set(initial.unwrap_or_default());
        store
    }

    pub fn get(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn set(&mut self, value: impl Into<String>) {
        let value = value.into().trim().to_string();
        self.api_key = if value.is_empty() { None } else { Some(value) };
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn status(&self) -> CredentialStatus {
        CredentialStatus::from(self)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("api_key", &self.status().key_hint)
            .finish()
    }
}

/// Credential status for display (masks the actual key)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialStatus {
    /// Whether an API key is configured
    pub has_key: bool,
    /// Masked version of the key (last 4 chars only)
    pub key_hint: Option<String>,
}

impl From<&CredentialStore> for CredentialStatus {
    fn from(store: &CredentialStore) -> Self {
        let key_hint = store.get().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            if chars.len() > 4 {
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("••••{}", tail)
            } else {
                "••••".to_string()
            }
        });

        Self {
            has_key: key_hint.is_some(),
            key_hint,
        }
    }
}

/// Request to replace the credential. An empty key clears it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsRequest {
    pub api_key: String,
}
