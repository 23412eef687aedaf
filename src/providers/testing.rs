//! Scripted provider for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::conversation::Message;

use super::{ChatProvider, Completion, ProviderError, Usage};

/// Returns queued results in order and records every transcript it was sent.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<Completion, ProviderError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<Completion, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider that must never be called.
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    pub fn text(content: &str, usage: Usage) -> Result<Completion, ProviderError> {
        Ok(Completion {
            content: content.to_string(),
            usage,
        })
    }

    pub fn failure(message: &str) -> Result<Completion, ProviderError> {
        Err(ProviderError::InvalidResponse(message.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, messages: &[Message]) -> Result<Completion, ProviderError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedProvider: no reply queued for call")
    }
}

#[async_trait]
impl<P: ChatProvider + ?Sized> ChatProvider for std::sync::Arc<P> {
    fn model(&self) -> &str {
        (**self).model()
    }

    async fn complete(&self, messages: &[Message]) -> Result<Completion, ProviderError> {
        (**self).complete(messages).await
    }
}
