//! Runtime Manager: discovers, installs and removes the AI runtimes that
//! execute compiled scripts.
//!
//! Runtime resolution (per RuntimeKind):
//!   1. managed binary   `{runtime_dir}/{binary}` (default `~/.awd/runtimes`)
//!   2. system binary    search of PATH
//!
//! Setup and removal only ever touch the managed directory. Setup runs the
//! embedded shell script for the runtime and reports its exit code; what the
//! script does is its own business.

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{AwdError, Result};
use crate::shell_env;

/// Environment variable that overrides the managed runtime directory.
pub const RUNTIME_DIR_ENV: &str = "AWD_RUNTIME_DIR";

/// Upper bound on `<binary> --version`.
const VERSION_TIMEOUT: Duration = Duration::from_secs(5);
const VERSION_POLL: Duration = Duration::from_millis(25);

const COMMON_SCRIPT: &str = include_str!("../scripts/runtime/setup-common.sh");
const CODEX_SCRIPT: &str = include_str!("../scripts/runtime/setup-codex.sh");
const LLM_SCRIPT: &str = include_str!("../scripts/runtime/setup-llm.sh");

// ─── Runtime Kind ──────────────────────────────────────────────────────────

/// The closed set of supported runtimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    Codex,
    Llm,
}

impl RuntimeKind {
    /// Every runtime, in preference order.
    pub const ALL: [RuntimeKind; 2] = [RuntimeKind::Codex, RuntimeKind::Llm];

    pub fn name(&self) -> &'static str {
        match self {
            RuntimeKind::Codex => "codex",
            RuntimeKind::Llm => "llm",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RuntimeKind::Codex => "OpenAI Codex CLI with GitHub Models support",
            RuntimeKind::Llm => "Simon Willison's LLM library with multiple providers",
        }
    }

    /// Executable name, both in the managed dir and on PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            RuntimeKind::Codex => "codex",
            RuntimeKind::Llm => "llm",
        }
    }

    /// Embedded setup script.
    fn setup_script(&self) -> &'static str {
        match self {
            RuntimeKind::Codex => CODEX_SCRIPT,
            RuntimeKind::Llm => LLM_SCRIPT,
        }
    }

    /// Extra directories under the runtime dir owned by this runtime.
    fn auxiliary_dirs(&self) -> &'static [&'static str] {
        match self {
            RuntimeKind::Codex => &["codex-npm"],
            RuntimeKind::Llm => &["llm-venv"],
        }
    }
}

impl std::fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuntimeKind {
    type Err = AwdError;

    fn from_str(s: &str) -> Result<Self> {
        RuntimeKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| AwdError::UnsupportedRuntime(s.to_string()))
    }
}

// ─── Runtime Record ────────────────────────────────────────────────────────

/// Snapshot of one runtime's on-disk state. Recomputed on every query.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeRecord {
    pub name: String,
    pub description: String,
    pub installed: bool,
    /// Resolved executable (managed first, then PATH)
    pub install_path: Option<PathBuf>,
    /// True when `install_path` is inside the managed runtime dir
    pub managed: bool,
    pub version: Option<String>,
}

// ─── Manager ──────────────────────────────────────────────────────────────

pub struct RuntimeManager {
    runtime_dir: PathBuf,
    /// PATH used for the system search; `None` means the process PATH
    system_path: Option<OsString>,
}

impl RuntimeManager {
    /// Manager rooted at `$AWD_RUNTIME_DIR`, or `~/.awd/runtimes`.
    pub fn new() -> Result<Self> {
        let runtime_dir = match std::env::var_os(RUNTIME_DIR_ENV).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| AwdError::Config("Cannot determine home directory".into()))?
                .join(".awd")
                .join("runtimes"),
        };
        Ok(Self::with_runtime_dir(runtime_dir))
    }

    pub fn with_runtime_dir(runtime_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime_dir: runtime_dir.into(),
            system_path: None,
        }
    }

    /// Search `path` instead of the process PATH for system binaries.
    pub fn with_system_path(mut self, path: impl Into<OsString>) -> Self {
        self.system_path = Some(path.into());
        self
    }

    pub fn runtime_dir(&self) -> &Path {
        &self.runtime_dir
    }

    fn managed_binary(&self, kind: RuntimeKind) -> PathBuf {
        self.runtime_dir.join(kind.binary())
    }

    fn system_binary(&self, kind: RuntimeKind) -> Option<PathBuf> {
        match &self.system_path {
            Some(path) => shell_env::which_in(kind.binary(), path),
            None => shell_env::which(kind.binary()),
        }
    }

    /// Resolved executable and whether it is managed. Files without the
    /// executable bit do not count.
    pub fn resolve(&self, kind: RuntimeKind) -> Option<(PathBuf, bool)> {
        let managed = self.managed_binary(kind);
        if shell_env::is_executable(&managed) {
            return Some((managed, true));
        }
        self.system_binary(kind).map(|p| (p, false))
    }

    pub fn is_runtime_available(&self, kind: RuntimeKind) -> bool {
        self.resolve(kind).is_some()
    }

    /// Fixed preference order, independent of what is installed.
    pub fn get_runtime_preference(&self) -> &'static [RuntimeKind] {
        &RuntimeKind::ALL
    }

    /// First installed runtime in preference order; `None` when nothing is
    /// installed.
    pub fn get_available_runtime(&self) -> Option<RuntimeKind> {
        self.get_runtime_preference()
            .iter()
            .copied()
            .find(|k| self.is_runtime_available(*k))
    }

    /// One record per supported runtime, in preference order.
    pub fn list_runtimes(&self) -> Vec<RuntimeRecord> {
        RuntimeKind::ALL
            .iter()
            .map(|&kind| {
                let resolved = self.resolve(kind);
                let version = resolved.as_ref().map(|(path, _)| probe_version(path));
                RuntimeRecord {
                    name: kind.name().to_string(),
                    description: kind.description().to_string(),
                    installed: resolved.is_some(),
                    managed: resolved.as_ref().is_some_and(|(_, managed)| *managed),
                    install_path: resolved.map(|(path, _)| path),
                    version,
                }
            })
            .collect()
    }

    /// Run the embedded setup script for `kind`.
    ///
    /// The script and the shared helpers are written to a temp directory and
    /// run as `bash setup-script.sh [version] [--vanilla]` with inherited
    /// streams. `AWD_RUNTIME_DIR` is set to this manager's directory.
    pub fn setup_runtime(&self, kind: RuntimeKind, version: Option<&str>, vanilla: bool) -> Result<()> {
        tracing::info!(
            "[RuntimeManager] Setting up {} (version={:?}, vanilla={})",
            kind,
            version,
            vanilla
        );

        let work = tempfile::tempdir()?;
        write_script(&work.path().join("setup-common.sh"), COMMON_SCRIPT)?;
        let script = work.path().join("setup-script.sh");
        write_script(&script, kind.setup_script())?;

        let status = Command::new("bash")
            .arg(&script)
            .args(setup_args(version, vanilla))
            .current_dir(work.path())
            .env(RUNTIME_DIR_ENV, &self.runtime_dir)
            .status()
            .map_err(|e| AwdError::ExternalProcess(format!("Failed to run setup for {}: {}", kind, e)))?;

        if !status.success() {
            return Err(AwdError::ExternalProcess(format!(
                "Setup of runtime '{}' failed ({})",
                kind, status
            )));
        }
        tracing::info!("[RuntimeManager] {} set up in {}", kind, self.runtime_dir.display());
        Ok(())
    }

    /// Delete the managed binary and the runtime's auxiliary directories.
    pub fn remove_runtime(&self, kind: RuntimeKind) -> Result<()> {
        let binary = self.managed_binary(kind);
        if !binary.exists() {
            return Err(AwdError::RuntimeNotInstalled(kind.name().to_string()));
        }

        if binary.is_dir() {
            std::fs::remove_dir_all(&binary)?;
        } else {
            std::fs::remove_file(&binary)?;
        }

        for aux in kind.auxiliary_dirs() {
            let dir = self.runtime_dir.join(aux);
            if dir.exists() {
                std::fs::remove_dir_all(&dir)?;
            }
        }
        tracing::info!("[RuntimeManager] Removed {}", kind);
        Ok(())
    }
}

/// Arguments passed to a setup script.
pub fn setup_args(version: Option<&str>, vanilla: bool) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(v) = version.filter(|v| !v.is_empty()) {
        args.push(v.to_string());
    }
    if vanilla {
        args.push("--vanilla".to_string());
    }
    args
}

fn write_script(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

/// `<binary> --version`, trimmed; `"unknown"` on failure or timeout.
///
/// Stdout is drained on a reader thread so verbose output cannot fill the
/// pipe and stall the child.
fn probe_version(binary: &Path) -> String {
    const UNKNOWN: &str = "unknown";

    let mut child = match Command::new(binary)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!("[RuntimeManager] Cannot run {}: {}", binary.display(), e);
            return UNKNOWN.to_string();
        }
    };

    let reader = child.stdout.take().map(|mut stdout| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            buf
        })
    });

    let deadline = Instant::now() + VERSION_TIMEOUT;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() < deadline => std::thread::sleep(VERSION_POLL),
            Ok(None) | Err(_) => {
                tracing::debug!("[RuntimeManager] {} --version timed out", binary.display());
                let _ = child.kill();
                let _ = child.wait();
                return UNKNOWN.to_string();
            }
        }
    };

    let output = reader.and_then(|handle| handle.join().ok()).unwrap_or_default();
    if !status.success() {
        return UNKNOWN.to_string();
    }
    let text = String::from_utf8_lossy(&output).trim().to_string();
    if text.is_empty() {
        UNKNOWN.to_string()
    } else {
        text
    }
}
