//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command. Commands build the
//! core services they need from [`Context`] and return `Err(String)` for
//! anything that should end the process with exit code 1.

pub mod config;
pub mod deps;
pub mod install;
pub mod list;
pub mod mcp;
pub mod run;
pub mod runtime;

use std::path::PathBuf;

use awd_core::{RegistryClient, RuntimeManager};

/// Global options shared by every command.
pub struct Context {
    pub project: Option<PathBuf>,
    pub registry_url: Option<String>,
    pub runtime_dir: Option<PathBuf>,
    pub json: bool,
}

impl Context {
    /// `--project`, or the current directory.
    pub fn project_root(&self) -> Result<PathBuf, String> {
        let root = match &self.project {
            Some(p) => p.clone(),
            None => std::env::current_dir()
                .map_err(|e| format!("Cannot determine current directory: {}", e))?,
        };
        tracing::debug!("[awd] Project root: {}", root.display());
        Ok(root)
    }

    pub fn registry(&self) -> Result<RegistryClient, String> {
        RegistryClient::from_env(self.registry_url.clone()).map_err(|e| e.to_string())
    }

    pub fn runtime_manager(&self) -> Result<RuntimeManager, String> {
        match &self.runtime_dir {
            Some(dir) => Ok(RuntimeManager::with_runtime_dir(dir)),
            None => RuntimeManager::new().map_err(|e| e.to_string()),
        }
    }
}

/// Pretty-print a serializable value to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}
