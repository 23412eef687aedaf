//! Chat-completion providers

mod openai_compat;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::Message;

pub use openai_compat::{OpenAICompatConfig, OpenAICompatProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Token counters reported for one model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// A model reply together with its token accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: Usage,
}

/// A remote model that answers a role-tagged transcript.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send the full transcript (system prompt, history, new user turn).
    async fn complete(&self, messages: &[Message]) -> Result<Completion, ProviderError>;
}
