//! PATH helpers: locate executables and build child-process PATH values.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Find executable `cmd` on the current process PATH.
pub fn which(cmd: &str) -> Option<PathBuf> {
    which::which(cmd).ok()
}

/// Find executable `cmd` in an explicit PATH-style list of directories.
pub fn which_in(cmd: &str, path: &OsStr) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which::which_in(cmd, Some(path), cwd).ok()
}

/// True when `path` is a regular file the current user may execute.
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Current PATH with `dir` prepended (skipped when already first).
pub fn prepend_to_path(dir: &Path) -> OsString {
    let current = std::env::var_os("PATH").unwrap_or_default();
    let mut parts: Vec<PathBuf> = std::env::split_paths(&current).collect();
    if parts.first().map(PathBuf::as_path) != Some(dir) {
        parts.insert(0, dir.to_path_buf());
    }
    std::env::join_paths(parts).unwrap_or(current)
}
