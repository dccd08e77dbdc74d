//! Plan extraction — ask the model which actions the instruction needs and
//! which file it targets.
//!
//! Parsing is best-effort: the first balanced `{...}` in the reply is
//! decoded as JSON. Anything malformed yields an empty plan, which the
//! router sends straight to modification.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::StageFailure;
use crate::llm::types::Message;
use crate::llm::LanguageModel;
use crate::prompts::build_plan_prompt;
use crate::state::{PlanStep, RunState, StateUpdate};

/// The structured plan extracted from the model's reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub steps: BTreeSet<PlanStep>,
    pub file_path: String,
}

impl Plan {
    fn into_update(self) -> StateUpdate {
        StateUpdate {
            plan_steps: Some(self.steps),
            file_path: Some(self.file_path),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    steps: Option<RawSteps>,
    #[serde(default)]
    file_path: Option<String>,
}

/// `steps` as models actually write it: a list, a bare identifier, or
/// something unusable that must not cost us the `file_path`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSteps {
    One(String),
    Many(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

impl RawSteps {
    fn ids(&self) -> Vec<&str> {
        match self {
            RawSteps::One(id) => vec![id.as_str()],
            RawSteps::Many(items) => items.iter().filter_map(|v| v.as_str()).collect(),
            RawSteps::Other(value) => {
                tracing::warn!(steps = %value, "ignoring malformed plan steps");
                Vec::new()
            }
        }
    }
}

pub async fn plan(state: &RunState, model: &dyn LanguageModel) -> StateUpdate {
    let prompt = build_plan_prompt(state.instruction());

    let reply = match model.complete(&[Message::user(prompt)]).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("{}", StageFailure::PlanRequest(e));
            return Plan::default().into_update();
        }
    };
    tracing::debug!(reply_len = reply.len(), "plan reply");

    let plan = parse_plan(&reply).unwrap_or_else(|failure| {
        tracing::warn!("{failure}");
        Plan::default()
    });
    tracing::info!(
        steps = ?plan.steps,
        file_path = %plan.file_path,
        "plan extracted"
    );
    plan.into_update()
}

/// Parse a plan out of free text.
pub fn parse_plan(reply: &str) -> Result<Plan, StageFailure> {
    let json = first_balanced_braces(reply)
        .ok_or_else(|| StageFailure::PlanParse("no JSON object found in reply".into()))?;
    let raw: RawPlan =
        serde_json::from_str(json).map_err(|e| StageFailure::PlanParse(e.to_string()))?;

    let mut steps = BTreeSet::new();
    for id in raw.steps.as_ref().map(RawSteps::ids).unwrap_or_default() {
        match PlanStep::from_id(id) {
            Some(step) => {
                steps.insert(step);
            }
            None => tracing::warn!(step = %id, "ignoring unknown plan step"),
        }
    }

    Ok(Plan {
        steps,
        file_path: expand_home(raw.file_path.as_deref().unwrap_or("")),
    })
}

/// First `{...}` substring whose braces balance. Braces inside JSON string
/// literals do not count.
fn first_balanced_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return path.to_string(),
    };
    match dirs::home_dir() {
        Some(home) => format!("{}{rest}", home.display()),
        None => path.to_string(),
    }
}
