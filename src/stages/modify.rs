//! Code modification — have the model rewrite the file and pull the code
//! out of its reply.
//!
//! The fence tag to look for follows the target's suffix (`.py` → python,
//! `.sql` → sql). Targets of any other kind accept the first fenced block.
//! When nothing matches, `modified_code` keeps its previous value.

use regex::Regex;

use crate::error::StageFailure;
use crate::llm::types::Message;
use crate::llm::LanguageModel;
use crate::prompts::build_modify_prompt;
use crate::state::{RunState, StateUpdate};

use super::{effective_path, SourceKind};

pub async fn modify(
    state: &RunState,
    model: &dyn LanguageModel,
    default_file: &str,
) -> StateUpdate {
    let target = effective_path(&state.file_path, default_file);
    let tag = SourceKind::of(target).fence_tag();
    let prompt = build_modify_prompt(
        state.instruction(),
        &state.file_content.prompt_text(),
        tag,
    );

    let reply = match model.complete(&[Message::user(prompt)]).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("{}", StageFailure::CodeRequest(e));
            return StateUpdate::default();
        }
    };

    match extract_fenced(&reply, tag) {
        Some(code) => {
            tracing::info!(path = %target, bytes = code.len(), "code generated");
            StateUpdate {
                modified_code: Some(code),
                ..Default::default()
            }
        }
        None => {
            let failure = StageFailure::CodeExtraction(tag.unwrap_or("any").to_string());
            tracing::warn!("{failure}");
            StateUpdate::default()
        }
    }
}

/// Interior of the first fenced block tagged `tag`, or of the first fenced
/// block of any tag when `tag` is `None`.
///
/// The interior starts after the opening fence line and runs up to the
/// closing fence, byte for byte. A closing fence must open its own line;
/// backticks in the middle of a code line are content.
pub fn extract_fenced(reply: &str, tag: Option<&str>) -> Option<String> {
    let pattern = match tag {
        Some(tag) => format!(
            r"(?s)```[ \t]*(?i:{})[ \t]*\r?\n(.*?)(?m:^)[ \t]*```",
            regex::escape(tag)
        ),
        None => r"(?s)```[^\n`]*\r?\n(.*?)(?m:^)[ \t]*```".to_string(),
    };
    let re = Regex::new(&pattern).ok()?;
    re.captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
