//! Conversation types and session memory
//!
//! The memory is the transcript replayed to the model on every fallback call.
//! It starts with the system prompt and only ever grows by whole exchanges.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Ordered, append-only transcript for one support session.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    messages: Vec<Message>,
    /// Optional upper bound on stored messages; `None` keeps everything.
    max_messages: Option<usize>,
}

impl ConversationMemory {
    /// Create memory seeded with the system prompt.
    pub fn new(system_prompt: &str) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
            max_messages: None,
        }
    }

    /// Bound the transcript. Eviction drops the oldest exchange, never the system prompt.
    pub fn with_max_messages(mut self, max_messages: Option<usize>) -> Self {
        self.max_messages = max_messages;
        self
    }

    #[cfg(test)]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Build the request for the next model call: prior transcript plus the new user turn.
    pub fn request_with(&self, user_input: &str) -> Vec<Message> {
        let mut request = self.messages.clone();
        request.push(Message::user(user_input));
        request
    }

    /// Record one completed fallback exchange.
    pub fn record_exchange(&mut self, user_input: &str, reply: &str) {
        self.messages.push(Message::user(user_input));
        self.messages.push(Message::assistant(reply));
        self.enforce_cap();
    }

    fn enforce_cap(&mut self) {
        let Some(max) = self.max_messages else {
            return;
        };

        // The system prompt plus one exchange is the smallest useful transcript.
        let max = max.max(3);
        let mut evicted = 0;
        while self.messages.len() > max {
            self.messages.drain(1..3);
            evicted += 1;
        }

        if evicted > 0 {
            tracing::warn!(
                evicted_exchanges = evicted,
                max_messages = max,
                "conversation memory cap reached, oldest exchanges dropped"
            );
        }
    }
}
