//! Stage failure taxonomy.
//!
//! No failure escapes a stage. Each one is rendered into the stage's own
//! state field and logged; the run always reaches its terminal node.

use std::time::Duration;

use crate::llm::LlmError;
use crate::tools::{FileError, RunError};

#[derive(Debug, thiserror::Error)]
pub enum StageFailure {
    #[error("plan parse failure: {0}")]
    PlanParse(String),

    #[error("plan request failed: {0}")]
    PlanRequest(#[source] LlmError),

    #[error("{0}")]
    FileRead(#[source] FileError),

    #[error("no fenced `{0}` block found in model reply")]
    CodeExtraction(String),

    #[error("code request failed: {0}")]
    CodeRequest(#[source] LlmError),

    #[error("no code produced")]
    NoCode,

    #[error("{0}")]
    FileWrite(#[source] FileError),

    #[error("{0}")]
    ProcessSpawn(#[source] RunError),

    #[error("{0}")]
    NonZeroExit(#[source] RunError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("no code was saved")]
    NothingSaved,

    #[error("'{0}' is not an executable source file")]
    NonExecutableKind(String),
}

impl From<RunError> for StageFailure {
    fn from(err: RunError) -> Self {
        match err {
            RunError::Timeout(limit) => StageFailure::Timeout(limit),
            RunError::NonZeroExit { .. } => StageFailure::NonZeroExit(err),
            RunError::Spawn { .. } | RunError::Io(_) => StageFailure::ProcessSpawn(err),
        }
    }
}
