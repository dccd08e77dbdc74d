//! Model and workspace configuration for planact.
//!
//! Loaded from a YAML file. Every field has a default, so an empty file
//! (or no file at all) yields a working configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default file written when the plan names no target path.
pub const DEFAULT_FILE: &str = "modified_code.py";

/// Default interpreter used to run generated Python files.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub model: ModelConfig,
    pub workspace: WorkspaceConfig,
}

/// Language model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model alias (`opus`, `sonnet`, `haiku`) or full model id.
    pub name: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub base_url: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "sonnet".into(),
            max_tokens: 4096,
            temperature: 0.0,
            api_key_env: "ANTHROPIC_API_KEY".into(),
            base_url: "https://api.anthropic.com".into(),
        }
    }
}

/// Where generated code lands and how it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Target used when the plan resolves no path. Stable for the whole process.
    pub default_file: String,
    pub interpreter: String,
    /// Kill the interpreter after this many seconds. Unbounded when absent.
    pub timeout_secs: Option<u64>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            default_file: DEFAULT_FILE.into(),
            interpreter: DEFAULT_INTERPRETER.into(),
            timeout_secs: None,
        }
    }
}

impl FlowConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: FlowConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace.default_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "workspace.default_file must not be empty".into(),
            ));
        }
        if self.workspace.interpreter.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "workspace.interpreter must not be empty".into(),
            ));
        }
        if self.model.max_tokens == 0 {
            return Err(ConfigError::Invalid("model.max_tokens must be > 0".into()));
        }
        Ok(())
    }
}
