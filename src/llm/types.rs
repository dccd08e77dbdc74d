//! Message log entries and the wire shapes of a Messages API call.

use serde::{Deserialize, Serialize};

const MODEL_ALIASES: &[(&str, &str)] = &[
    ("opus", "claude-opus-4-20250514"),
    ("sonnet", "claude-sonnet-4-5-20250514"),
    ("haiku", "claude-haiku-4-5-20251001"),
];

/// Full model id for a short alias. Anything else is taken as an id already.
pub fn resolve_model(name: &str) -> &str {
    MODEL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, id)| *id)
        .unwrap_or(name)
}

/// One entry of the run's message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Body posted for a single completion.
#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: &'a [Message],
}

/// The parts of a reply the workflow looks at.
#[derive(Debug, Deserialize)]
pub(crate) struct CompletionReply {
    pub model: String,
    pub content: Vec<ReplyBlock>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ReplyBlock {
    Text {
        text: String,
    },
    /// Tool calls, thinking and anything newer.
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl CompletionReply {
    /// Text blocks joined in order, or `None` when the reply carries none.
    pub fn into_text(self) -> Option<String> {
        let mut text = None::<String>;
        for block in self.content {
            if let ReplyBlock::Text { text: part } = block {
                text.get_or_insert_with(String::new).push_str(&part);
            }
        }
        text
    }
}
