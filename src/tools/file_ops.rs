//! Text file I/O for the read and persist stages.

use std::path::Path;

/// Errors from file operations.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("{source}: '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not valid UTF-8 text")]
    NotUtf8 { path: String },
}

impl FileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        FileError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Read a whole file as UTF-8 text.
pub async fn read_text(path: &Path) -> Result<String, FileError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FileError::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| FileError::NotUtf8 {
        path: path.display().to_string(),
    })
}

/// Write `contents` as the file's full text, creating or truncating it.
pub async fn write_text(path: &Path, contents: &str) -> Result<(), FileError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| FileError::io(path, e))
}
