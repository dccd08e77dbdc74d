//! Persistence — write the generated code over the target file.

use std::path::Path;

use crate::error::StageFailure;
use crate::state::{RunState, StateUpdate};
use crate::tools::file_ops;

pub async fn persist(state: &RunState, default_file: &str) -> StateUpdate {
    let mut update = StateUpdate::default();

    let path = if state.file_path.is_empty() {
        tracing::info!(default = %default_file, "no target path, using default file");
        update.file_path = Some(default_file.to_string());
        default_file
    } else {
        state.file_path.as_str()
    };

    let status = match &state.modified_code {
        None => Err(StageFailure::NoCode),
        Some(code) => file_ops::write_text(Path::new(path), code)
            .await
            .map_err(StageFailure::FileWrite),
    };

    update.saved = Some(status.is_ok());
    update.save_status = Some(match status {
        Ok(()) => {
            tracing::info!(path = %path, "code saved");
            format!("Code saved to {path}.")
        }
        Err(failure) => {
            tracing::warn!("{failure}");
            format!("Error saving code: {failure}")
        }
    });
    update
}
