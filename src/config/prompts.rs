//! Prompt templates and fixed user-facing text
//!
//! Everything the assistant says on its own (as opposed to what the model
//! or the knowledge store produces) is defined here.

/// Words that end the session, compared case-insensitively after trimming.
pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "выход"];

/// Reserved command prefix for order lookups.
pub const ORDER_COMMAND: &str = "/order";

pub const ORDER_FORMAT_ERROR: &str = "Invalid command format. Use: /order <order number>";

pub const FAREWELL: &str = "Goodbye!";

pub const SESSION_ENDED: &str = "User initiated exit. Session ended.";
pub const SESSION_INTERRUPTED: &str = "Session interrupted by user.";
pub const INPUT_CLOSED: &str = "Input closed. Session ended.";

pub const FAQ_CONTEXT_HEADER: &str = "--- FAQ context ---";
pub const FAQ_CONTEXT_FOOTER: &str = "--- End of context ---";

/// System prompt for the support persona of `brand`.
pub fn system_prompt(brand: &str) -> String {
    format!(
        "You are the support assistant of the \"{brand}\" shop. \
         Answer briefly, politely and to the point. \
         Do not make up information that is not in the provided context. \
         Use the FAQ to answer general questions."
    )
}

/// The user turn sent to the model: FAQ context between banners, then the question.
pub fn augmented_question(faq_context: &str, question: &str) -> String {
    format!(
        "Using the following FAQ context, answer the user's question.\n\
         {FAQ_CONTEXT_HEADER}\n{faq_context}\n{FAQ_CONTEXT_FOOTER}\n\n\
         User question: {question}"
    )
}

/// Reply shown when the model call fails.
pub fn model_failure(cause: &dyn std::fmt::Display) -> String {
    format!("[Error] Could not get a response from the model: {cause}")
}

pub fn banner(brand: &str, model: &str) -> String {
    format!(
        "Support chat for the \"{brand}\" shop is running!\n\
         Model in use: {model}\n\
         Type your question or the command {ORDER_COMMAND} <id>. Type 'exit' to leave.\n"
    )
}
