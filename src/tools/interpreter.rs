//! Interpreter subprocess execution.
//!
//! Spawns `<program> <file>` with stdout/stderr captured. The child is
//! killed when its handle drops, so a timeout or an early return never
//! leaves it running.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

/// Errors from running a script.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' {status}: {stderr}")]
    NonZeroExit {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to collect output: {0}")]
    Io(#[from] std::io::Error),
}

/// Captured output of a script that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs a source file to completion.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(&self, path: &Path) -> Result<ScriptOutput, RunError>;
}

/// Runs files through an external interpreter program.
#[derive(Debug, Clone)]
pub struct Interpreter {
    program: String,
    timeout: Option<Duration>,
}

impl Interpreter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ScriptRunner for Interpreter {
    async fn run(&self, path: &Path) -> Result<ScriptOutput, RunError> {
        let child = Command::new(&self.program)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| RunError::Timeout(limit))??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            return Err(RunError::NonZeroExit {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        Ok(ScriptOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
