//! Core error type for AWD.
//!
//! `AwdError` is returned by every fallible operation in the core. The CLI
//! collapses all variants into exit code 1; the variants exist so callers can
//! tell "not there" apart from "broke while running" or "could not reach the
//! registry".

use std::path::PathBuf;

use indexmap::IndexMap;

pub type Result<T> = std::result::Result<T, AwdError>;

#[derive(Debug, thiserror::Error)]
pub enum AwdError {
    #[error("No awd.yml found in {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Script '{0}' not found")]
    ScriptNotFound(String),

    /// No script name was given and the manifest has no `start` script.
    /// Carries the scripts that *are* available so the caller can list them.
    #[error("No script specified and no 'start' script defined in awd.yml")]
    NoScriptSpecified { available: IndexMap<String, String> },

    #[error("Prompt file not found: {}", .0.display())]
    PromptNotFound(PathBuf),

    #[error("Runtime '{0}' is not installed in the AWD runtime directory")]
    RuntimeNotInstalled(String),

    #[error("Unsupported runtime: {0}")]
    UnsupportedRuntime(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    ExternalProcess(String),

    #[error("Registry request failed: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AwdError {
    /// True for the "something is absent" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AwdError::ManifestNotFound(_)
                | AwdError::ScriptNotFound(_)
                | AwdError::NoScriptSpecified { .. }
                | AwdError::PromptNotFound(_)
                | AwdError::RuntimeNotInstalled(_)
                | AwdError::NotFound(_)
        )
    }
}

impl From<reqwest::Error> for AwdError {
    fn from(e: reqwest::Error) -> Self {
        AwdError::Transport(e.to_string())
    }
}

impl From<serde_yaml::Error> for AwdError {
    fn from(e: serde_yaml::Error) -> Self {
        AwdError::Config(e.to_string())
    }
}
