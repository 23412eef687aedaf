//! Turn router
//!
//! Decides which handler answers each user utterance, in priority order:
//! 1. blank input is ignored
//! 2. exit keywords end the session
//! 3. `/order <id>` looks up an order
//! 4. an exact FAQ question returns the stored answer
//! 5. anything else goes to the model with the FAQ injected as context
//!
//! Only step 5 touches conversation memory. Every handled turn writes one
//! user record before dispatch and one assistant record after it.

use crate::config::prompts;
use crate::conversation::{ConversationMemory, Role};
use crate::knowledge::KnowledgeStore;
use crate::providers::{ChatProvider, Usage};

use super::session_log::SessionLogger;

/// Which handler produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Order,
    Faq,
    Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub reply: String,
    pub usage: Usage,
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Blank input: nothing said, nothing logged.
    Ignored,
    Reply(TurnReply),
    /// The user asked to leave; the session is over.
    Exit { farewell: String },
}

/// Everything one support session needs, built once at startup.
pub struct TurnRouter {
    knowledge: KnowledgeStore,
    memory: ConversationMemory,
    provider: Box<dyn ChatProvider>,
    log: SessionLogger,
}

impl TurnRouter {
    /// Start a session: seed memory with the system prompt and log it.
    pub fn new(
        knowledge: KnowledgeStore,
        provider: Box<dyn ChatProvider>,
        mut log: SessionLogger,
        system_prompt: &str,
        memory_cap: Option<usize>,
    ) -> Self {
        let memory = ConversationMemory::new(system_prompt).with_max_messages(memory_cap);
        log.log(Role::System, system_prompt, None);

        Self {
            knowledge,
            memory,
            provider,
            log,
        }
    }

    #[cfg(test)]
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Handle one raw line of user input.
    pub async fn handle_turn(&mut self, raw_input: &str) -> TurnOutcome {
        let input = raw_input.trim();
        if input.is_empty() {
            return TurnOutcome::Ignored;
        }

        if is_exit(input) {
            tracing::info!("user ended the session");
            self.log.log(Role::System, prompts::SESSION_ENDED, None);
            return TurnOutcome::Exit {
                farewell: prompts::FAREWELL.to_string(),
            };
        }

        self.log.log(Role::User, input, None);

        let turn = self.dispatch(input).await;
        tracing::debug!(route = ?turn.route, total_tokens = turn.usage.total_tokens, "turn handled");

        self.log.log(Role::Assistant, &turn.reply, Some(turn.usage));
        TurnOutcome::Reply(turn)
    }

    async fn dispatch(&mut self, input: &str) -> TurnReply {
        if let Some(args) = order_arguments(input) {
            let reply = match args.as_slice() {
                [id] => self.knowledge.lookup_order(id),
                _ => prompts::ORDER_FORMAT_ERROR.to_string(),
            };
            return TurnReply {
                reply,
                usage: Usage::default(),
                route: Route::Order,
            };
        }

        if let Some(answer) = self.knowledge.match_faq(input) {
            return TurnReply {
                reply: answer.to_string(),
                usage: Usage::default(),
                route: Route::Faq,
            };
        }

        let (reply, usage) = self.ask_model(input).await;
        TurnReply {
            reply,
            usage,
            route: Route::Model,
        }
    }

    /// Fallback path. A failed call leaves memory untouched and becomes a diagnostic reply.
    async fn ask_model(&mut self, question: &str) -> (String, Usage) {
        let augmented = prompts::augmented_question(&self.knowledge.faq_context(), question);
        let request = self.memory.request_with(&augmented);

        match self.provider.complete(&request).await {
            Ok(completion) => {
                let reply = completion.content.trim().to_string();
                self.memory.record_exchange(&augmented, &reply);
                (reply, completion.usage)
            }
            Err(e) => {
                tracing::warn!(error = %e, model = self.provider.model(), "model call failed");
                (prompts::model_failure(&e), Usage::default())
            }
        }
    }

    /// Log a final system notice for a session that ended without an exit keyword.
    pub fn end_session(&mut self, notice: &str) {
        self.log.log(Role::System, notice, None);
    }

    /// Release the session log.
    pub fn close(self) {
        self.log.close();
    }
}

fn is_exit(input: &str) -> bool {
    let normalized = input.to_lowercase();
    prompts::EXIT_KEYWORDS.iter().any(|keyword| *keyword == normalized)
}

/// Arguments after the `/order` prefix, or `None` if this is not an order command.
fn order_arguments(input: &str) -> Option<Vec<&str>> {
    if !input.to_lowercase().starts_with(prompts::ORDER_COMMAND) {
        return None;
    }
    Some(input.split_whitespace().skip(1).collect())
}
