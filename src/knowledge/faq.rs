//! FAQ entries, exact matching and context rendering

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    #[serde(rename = "q")]
    pub question: String,
    #[serde(rename = "a")]
    pub answer: String,
}

impl FaqEntry {
    #[cfg(test)]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// First entry whose normalized question equals the normalized input.
///
/// No substring or fuzzy matching: anything broader goes to the model,
/// which sees the whole FAQ as context.
pub(super) fn find<'a>(entries: &'a [FaqEntry], question: &str) -> Option<&'a str> {
    let wanted = normalize(question);
    entries
        .iter()
        .find(|entry| normalize(&entry.question) == wanted)
        .map(|entry| entry.answer.as_str())
}

pub(super) fn render(entries: &[FaqEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("Question: {}\nAnswer: {}", entry.question, entry.answer))
        .collect::<Vec<_>>()
        .join("\n")
}
