//! Script runner: resolves a named script from `awd.yml`, compiles its prompt
//! references and executes the result.
//!
//! ```text
//! RESOLVE_NAME ──► LOAD_COMMAND ──► COMPILE ──► EXECUTE ──► DONE
//!      │                │              │   (preview stops here)
//!      └────────────────┴──────────────┴──────────► FAILED
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{AwdError, Result};
use crate::manifest::{Manifest, ScriptDefinition};
use crate::prompt::{CompiledCommand, CompiledPrompt, PromptCompiler};
use crate::runtime::RuntimeManager;
use crate::shell_env;

/// Runs a shell command line and reports its exit code.
pub trait CommandExecutor {
    /// `path` replaces the child's PATH when given.
    fn execute(&self, command: &str, cwd: &Path, path: Option<&OsString>) -> Result<i32>;
}

/// Executes through the platform shell with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str, cwd: &Path, path: Option<&OsString>) -> Result<i32> {
        #[cfg(windows)]
        let mut cmd = {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        cmd.current_dir(cwd);
        if let Some(path) = path {
            cmd.env("PATH", path);
        }

        let status = cmd
            .status()
            .map_err(|e| AwdError::ExternalProcess(format!("Failed to start '{}': {}", command, e)))?;
        // A signal-terminated child has no exit code.
        Ok(status.code().unwrap_or(-1))
    }
}

/// Parse `name=value` tokens. The first `=` splits; tokens without one are
/// ignored. Later duplicates overwrite earlier ones.
pub fn parse_params<S: AsRef<str>>(tokens: &[S]) -> IndexMap<String, String> {
    let mut params = IndexMap::new();
    for token in tokens {
        let token = token.as_ref();
        match token.split_once('=') {
            Some((name, value)) => {
                params.insert(name.to_string(), value.to_string());
            }
            None => {
                tracing::debug!("[ScriptRunner] Ignoring parameter without '=': {}", token);
            }
        }
    }
    params
}

/// Result of `preview_script`.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub script_name: String,
    pub original: String,
    pub compiled: String,
    /// Templates that were compiled (empty when the command had none)
    pub prompts: Vec<CompiledPrompt>,
}

impl Preview {
    pub fn is_compiled(&self) -> bool {
        !self.prompts.is_empty()
    }
}

/// Result of a successful `run_script`.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub script_name: String,
    pub command: String,
    pub exit_code: i32,
}

pub struct ScriptRunner<E: CommandExecutor = ShellExecutor> {
    project_root: PathBuf,
    compiler: PromptCompiler,
    runtimes: Option<RuntimeManager>,
    executor: E,
}

impl ScriptRunner<ShellExecutor> {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_executor(project_root, ShellExecutor)
    }
}

impl<E: CommandExecutor> ScriptRunner<E> {
    pub fn with_executor(project_root: impl Into<PathBuf>, executor: E) -> Self {
        let project_root = project_root.into();
        Self {
            compiler: PromptCompiler::new(project_root.clone()),
            project_root,
            runtimes: None,
            executor,
        }
    }

    /// Put this manager's runtime directory first on the child's PATH.
    pub fn with_runtime_manager(mut self, runtimes: RuntimeManager) -> Self {
        self.runtimes = Some(runtimes);
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Scripts in manifest order.
    pub fn list_scripts(&self) -> Result<Vec<ScriptDefinition>> {
        Ok(Manifest::load(&self.project_root)?.scripts())
    }

    /// RESOLVE_NAME: an explicit name wins, otherwise the `start` script.
    pub fn resolve_script_name(&self, manifest: &Manifest, name: Option<&str>) -> Result<String> {
        match name {
            Some(name) => Ok(name.to_string()),
            None => manifest
                .default_script()
                .map(str::to_string)
                .ok_or_else(|| AwdError::NoScriptSpecified {
                    available: manifest.scripts.clone(),
                }),
        }
    }

    /// RESOLVE_NAME → LOAD_COMMAND → COMPILE.
    fn compile_script(
        &self,
        name: Option<&str>,
        params: &IndexMap<String, String>,
    ) -> Result<(ScriptDefinition, CompiledCommand)> {
        let manifest = Manifest::load(&self.project_root)?;
        let script_name = self.resolve_script_name(&manifest, name)?;
        let script = manifest
            .script(&script_name)
            .ok_or_else(|| AwdError::ScriptNotFound(script_name.clone()))?;
        let compiled = self.compiler.compile(&script.command, params)?;
        Ok((script, compiled))
    }

    /// Compile without executing.
    pub fn preview_script(
        &self,
        name: Option<&str>,
        params: &IndexMap<String, String>,
    ) -> Result<Preview> {
        let (script, compiled) = self.compile_script(name, params)?;
        Ok(Preview {
            script_name: script.name,
            original: script.command,
            compiled: compiled.command,
            prompts: compiled.prompts,
        })
    }

    /// Compile and execute. A non-zero exit becomes `ExternalProcess`.
    pub fn run_script(
        &self,
        name: Option<&str>,
        params: &IndexMap<String, String>,
    ) -> Result<RunOutcome> {
        let (script, compiled) = self.compile_script(name, params)?;
        if !compiled.is_compiled() {
            tracing::info!("[ScriptRunner] '{}' has no prompt templates", script.name);
        }

        let path = self
            .runtimes
            .as_ref()
            .map(RuntimeManager::runtime_dir)
            .filter(|dir| dir.is_dir())
            .map(shell_env::prepend_to_path);

        tracing::info!("[ScriptRunner] Executing '{}': {}", script.name, compiled.command);
        let exit_code = self
            .executor
            .execute(&compiled.command, &self.project_root, path.as_ref())?;

        if exit_code != 0 {
            return Err(AwdError::ExternalProcess(format!(
                "Script '{}' exited with code {}",
                script.name, exit_code
            )));
        }
        Ok(RunOutcome {
            script_name: script.name,
            command: compiled.command,
            exit_code,
        })
    }
}
