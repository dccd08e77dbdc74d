//! Shared state record threaded through every stage of one run.
//!
//! Stages never mutate `RunState` directly. Each returns a `StateUpdate`
//! and the executor merges it: messages are appended, every other field
//! present in the update replaces the current value.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::llm::types::Message;

/// Action identifiers a plan may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStep {
    ReadFile,
    ModifyCode,
}

impl PlanStep {
    /// Parse a wire identifier. Unknown identifiers yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "read_file" => Some(PlanStep::ReadFile),
            "modify_code" => Some(PlanStep::ModifyCode),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            PlanStep::ReadFile => "read_file",
            PlanStep::ModifyCode => "modify_code",
        }
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Outcome of the read stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum FileContent {
    /// The read stage did not run.
    #[default]
    NotRead,
    /// The read stage ran without a target path.
    NoPath,
    Loaded(String),
    /// Human-readable description of the read failure.
    Failed(String),
}

impl FileContent {
    /// Text handed to the model as the "code" to modify.
    ///
    /// Failures render as a message, so the model may end up rewriting an
    /// error string. That is accepted behavior.
    pub fn prompt_text(&self) -> String {
        match self {
            FileContent::NotRead => String::new(),
            FileContent::NoPath => "No file path provided by LLM.".into(),
            FileContent::Loaded(text) => text.clone(),
            FileContent::Failed(error) => format!("Error reading file: {error}"),
        }
    }
}

/// The record for one run. Created empty, filled stage by stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunState {
    pub messages: Vec<Message>,
    pub plan_steps: BTreeSet<PlanStep>,
    pub file_path: String,
    pub file_content: FileContent,
    pub modified_code: Option<String>,
    pub save_status: String,
    /// Whether the persist stage wrote `modified_code` to `file_path` in this run.
    pub saved: bool,
    pub execution_result: String,
}

impl RunState {
    /// Text of the latest message, or empty when there is none.
    pub fn instruction(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    /// Merge a stage's partial update into the record.
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages.extend(update.messages);
        if let Some(steps) = update.plan_steps {
            self.plan_steps = steps;
        }
        if let Some(path) = update.file_path {
            self.file_path = path;
        }
        if let Some(content) = update.file_content {
            self.file_content = content;
        }
        if let Some(code) = update.modified_code {
            self.modified_code = Some(code);
        }
        if let Some(status) = update.save_status {
            self.save_status = status;
        }
        if let Some(saved) = update.saved {
            self.saved = saved;
        }
        if let Some(result) = update.execution_result {
            self.execution_result = result;
        }
    }
}

/// Partial update returned by a stage. `None` fields leave the record alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
    pub plan_steps: Option<BTreeSet<PlanStep>>,
    pub file_path: Option<String>,
    pub file_content: Option<FileContent>,
    pub modified_code: Option<String>,
    pub save_status: Option<String>,
    pub saved: Option<bool>,
    pub execution_result: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_step_ids() {
        assert_eq!(PlanStep::from_id("read_file"), Some(PlanStep::ReadFile));
        assert_eq!(PlanStep::from_id("modify_code"), Some(PlanStep::ModifyCode));
        assert_eq!(PlanStep::from_id("delete_file"), None);
        assert_eq!(PlanStep::ReadFile.to_string(), "read_file");
    }

    #[test]
    fn apply_appends_messages() {
        let mut state = RunState::default();
        state.apply(StateUpdate {
            messages: vec![Message::user("first")],
            ..Default::default()
        });
        state.apply(StateUpdate {
            messages: vec![Message::user("second")],
            ..Default::default()
        });
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.instruction(), "second");
    }

    #[test]
    fn apply_replaces_only_present_fields() {
        let mut state = RunState {
            file_path: "utils.py".into(),
            modified_code: Some("old".into()),
            ..Default::default()
        };
        state.apply(StateUpdate {
            save_status: Some("Code saved to utils.py.".into()),
            ..Default::default()
        });
        assert_eq!(state.file_path, "utils.py");
        assert_eq!(state.modified_code.as_deref(), Some("old"));
        assert_eq!(state.save_status, "Code saved to utils.py.");
        assert!(!state.saved);

        state.apply(StateUpdate {
            modified_code: Some("new".into()),
            ..Default::default()
        });
        assert_eq!(state.modified_code.as_deref(), Some("new"));
    }

    #[test]
    fn instruction_of_empty_record() {
        assert_eq!(RunState::default().instruction(), "");
    }

    #[test]
    fn file_content_prompt_text() {
        assert_eq!(FileContent::NotRead.prompt_text(), "");
        assert_eq!(
            FileContent::NoPath.prompt_text(),
            "No file path provided by LLM."
        );
        assert_eq!(FileContent::Loaded("x = 1".into()).prompt_text(), "x = 1");
        assert!(FileContent::Failed("denied".into())
            .prompt_text()
            .starts_with("Error reading file: denied"));
    }

    #[test]
    fn record_serializes_with_step_ids() {
        let mut state = RunState::default();
        state.plan_steps.insert(PlanStep::ReadFile);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["plan_steps"][0], "read_file");
        assert_eq!(json["file_content"]["status"], "not_read");
    }
}
