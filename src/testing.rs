//! Test doubles for the workflow's collaborators.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::types::Message;
use crate::llm::{LanguageModel, LlmError};
use crate::tools::{RunError, ScriptOutput, ScriptRunner};

/// Replays canned replies in order and records every prompt it receives.
/// `None` entries (and an exhausted script) answer with an error.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_replies(replies.into_iter().map(|r| Some(r.into())))
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::with_replies([])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or_else(|| LlmError::InvalidResponse("scripted failure".into()))
    }
}

/// Records the paths it is asked to run and answers with a fixed outcome.
pub struct RecordingRunner {
    outcome: Result<String, String>,
    calls: Mutex<Vec<PathBuf>>,
}

impl RecordingRunner {
    pub fn succeeding(stdout: &str) -> Self {
        Self {
            outcome: Ok(stdout.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with_exit(stderr: &str) -> Self {
        Self {
            outcome: Err(stderr.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptRunner for RecordingRunner {
    async fn run(&self, path: &Path) -> Result<ScriptOutput, RunError> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        match &self.outcome {
            Ok(stdout) => Ok(ScriptOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            Err(stderr) => Err(RunError::NonZeroExit {
                program: "python3".into(),
                status: "exit status: 1".into(),
                stderr: stderr.clone(),
            }),
        }
    }
}
