//! Client targets: the editors/runtimes an MCP server gets installed into.
//!
//! Each target owns one install mechanism (usually a JSON config file) and
//! one local "installed" marker (the server's presence in that file).

pub mod vscode;

use std::path::Path;

use crate::error::{AwdError, Result};
use crate::registry::ServerInfo;

pub use vscode::VsCodeClientAdapter;

/// Client used when none is specified.
pub const DEFAULT_CLIENT: &str = "vscode";

/// Supported client identifiers.
pub const SUPPORTED_CLIENTS: &[&str] = &["vscode"];

/// An install target for MCP servers.
pub trait ClientAdapter {
    /// Client identifier, e.g. `"vscode"`.
    fn name(&self) -> &str;

    /// True when a server is already configured under `server_name`.
    fn is_installed(&self, server_name: &str) -> Result<bool>;

    /// Add (or replace) the configuration for `server_name`.
    fn configure_server(&self, server_name: &str, server: &ServerInfo) -> Result<()>;
}

/// Build the adapter for a client id, rooted at `project_root`.
pub fn client_for(client: &str, project_root: &Path) -> Result<Box<dyn ClientAdapter>> {
    match client {
        "vscode" => Ok(Box::new(VsCodeClientAdapter::new(project_root))),
        other => Err(AwdError::Config(format!(
            "Unsupported client '{}'. Supported clients: {}",
            other,
            SUPPORTED_CLIENTS.join(", ")
        ))),
    }
}
