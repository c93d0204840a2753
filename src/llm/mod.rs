// LLM abstraction layer

pub mod provider;
pub mod google;

pub use provider::*;
pub use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse, TokenUsage};
