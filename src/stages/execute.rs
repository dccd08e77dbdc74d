//! Execution — run the persisted file and capture what it prints.
//!
//! Terminal observation point: every outcome, including a crash of the
//! script itself, ends up as text in `execution_result`.

use std::path::Path;

use crate::error::StageFailure;
use crate::state::{RunState, StateUpdate};
use crate::tools::ScriptRunner;

use super::SourceKind;

/// Result text for files the interpreter does not handle.
pub const NOT_EXECUTABLE: &str = "Not an executable source file.";

/// Only a file written by this run's persist stage is handed to the runner.
/// Whatever was on disk before is never executed.
pub async fn execute(state: &RunState, runner: &dyn ScriptRunner) -> StateUpdate {
    let path = state.file_path.as_str();

    let result = if !SourceKind::of(path).is_executable() {
        tracing::info!("{}", StageFailure::NonExecutableKind(path.to_string()));
        NOT_EXECUTABLE.to_string()
    } else if !state.saved {
        let failure = StageFailure::NothingSaved;
        tracing::warn!(path = %path, "{failure}");
        format!("Error running file: {failure}")
    } else {
        tracing::info!(path = %path, "running file");
        match runner.run(Path::new(path)).await {
            Ok(output) => {
                if !output.stderr.is_empty() {
                    tracing::debug!(stderr = %output.stderr.trim_end(), "script wrote to stderr");
                }
                output.stdout
            }
            Err(e) => {
                let failure = StageFailure::from(e);
                tracing::warn!("{failure}");
                format!("Error running file: {failure}")
            }
        }
    };

    StateUpdate {
        execution_result: Some(result),
        ..Default::default()
    }
}
