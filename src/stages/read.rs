//! File read — load the planned target so the model can modify it.

use std::path::Path;

use crate::error::StageFailure;
use crate::state::{FileContent, RunState, StateUpdate};
use crate::tools::file_ops;

pub async fn read(state: &RunState) -> StateUpdate {
    let content = if state.file_path.is_empty() {
        tracing::warn!("no file path to read");
        FileContent::NoPath
    } else {
        match file_ops::read_text(Path::new(&state.file_path)).await {
            Ok(text) => {
                tracing::debug!(path = %state.file_path, bytes = text.len(), "file read");
                FileContent::Loaded(text)
            }
            Err(e) => {
                let failure = StageFailure::FileRead(e);
                tracing::warn!("{failure}");
                FileContent::Failed(failure.to_string())
            }
        }
    };

    StateUpdate {
        file_content: Some(content),
        ..Default::default()
    }
}
