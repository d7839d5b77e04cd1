//! VS Code client: `.vscode/mcp.json` in the project.
//!
//! ```json
//! {
//!   "servers": {
//!     "github": { "type": "stdio", "command": "npx", "args": ["-y", "@github/mcp"] }
//!   }
//! }
//! ```
//!
//! Keys other than `servers` are preserved when the file is rewritten.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use super::ClientAdapter;
use crate::error::{AwdError, Result};
use crate::registry::ServerInfo;

pub struct VsCodeClientAdapter {
    config_path: PathBuf,
}

impl VsCodeClientAdapter {
    pub fn new(project_root: &Path) -> Self {
        Self {
            config_path: project_root.join(".vscode").join("mcp.json"),
        }
    }

    /// Use an explicit config file instead of `<project>/.vscode/mcp.json`.
    pub fn with_config_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn read_config(&self) -> Result<Map<String, Value>> {
        if !self.config_path.is_file() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.config_path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AwdError::Config(format!(
                "{} is not a JSON object",
                self.config_path.display()
            ))),
            Err(e) => Err(AwdError::Config(format!(
                "Failed to parse {}: {}",
                self.config_path.display(),
                e
            ))),
        }
    }

    fn write_config(&self, config: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| AwdError::Config(format!("Failed to encode MCP config: {}", e)))?;
        std::fs::write(&self.config_path, text)?;
        Ok(())
    }
}

/// Translate a registry record into a VS Code server entry.
pub fn server_entry(server: &ServerInfo) -> Result<Value> {
    if let Some(pkg) = server.packages.first() {
        let hint = pkg.runtime_hint.as_deref().unwrap_or("npx");
        let (command, args) = match hint {
            "npx" => ("npx", vec!["-y".to_string(), pkg.name.clone()]),
            "uvx" => ("uvx", vec![pkg.name.clone()]),
            "docker" => (
                "docker",
                vec![
                    "run".to_string(),
                    "-i".to_string(),
                    "--rm".to_string(),
                    pkg.name.clone(),
                ],
            ),
            other => (other, vec![pkg.name.clone()]),
        };
        return Ok(json!({
            "type": "stdio",
            "command": command,
            "args": args,
        }));
    }

    if let Some(remote) = server.remotes.first() {
        let transport = if remote.transport_type == "sse" { "sse" } else { "http" };
        return Ok(json!({
            "type": transport,
            "url": remote.url,
        }));
    }

    Err(AwdError::Config(format!(
        "Server '{}' has no packages or remotes to configure",
        server.name
    )))
}

impl ClientAdapter for VsCodeClientAdapter {
    fn name(&self) -> &str {
        "vscode"
    }

    fn is_installed(&self, server_name: &str) -> Result<bool> {
        let config = self.read_config()?;
        Ok(config
            .get("servers")
            .and_then(Value::as_object)
            .is_some_and(|servers| servers.contains_key(server_name)))
    }

    fn configure_server(&self, server_name: &str, server: &ServerInfo) -> Result<()> {
        let entry = server_entry(server)?;
        let mut config = self.read_config()?;

        let servers = config
            .entry("servers")
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(servers) = servers.as_object_mut() else {
            return Err(AwdError::Config(format!(
                "'servers' in {} is not a JSON object",
                self.config_path.display()
            )));
        };
        servers.insert(server_name.to_string(), entry);

        self.write_config(&config)?;
        tracing::info!(
            "[VsCodeClientAdapter] Configured '{}' in {}",
            server_name,
            self.config_path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(value: Value) -> ServerInfo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_configure_writes_servers_entry() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = VsCodeClientAdapter::new(dir.path());
        assert!(!adapter.is_installed("test-package").unwrap());

        let info = server(json!({
            "id": "test-id",
            "name": "test-package",
            "packages": [{"name": "test-package", "runtime_hint": "npx"}]
        }));
        adapter.configure_server("test-package", &info).unwrap();

        assert!(adapter.is_installed("test-package").unwrap());
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(adapter.config_path()).unwrap()).unwrap();
        let entry = &written["servers"]["test-package"];
        assert_eq!(entry["type"], "stdio");
        assert_eq!(entry["command"], "npx");
        assert_eq!(entry["args"], json!(["-y", "test-package"]));
    }

    #[test]
    fn test_existing_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"inputs": [], "servers": {"old": {"type": "stdio"}}}"#).unwrap();
        let adapter = VsCodeClientAdapter::with_config_path(&path);

        let info = server(json!({
            "id": "r", "name": "remote",
            "remotes": [{"transport_type": "sse", "url": "https://example.com/sse"}]
        }));
        adapter.configure_server("remote", &info).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written["inputs"].is_array());
        assert!(written["servers"]["old"].is_object());
        assert_eq!(written["servers"]["remote"]["type"], "sse");
        assert_eq!(written["servers"]["remote"]["url"], "https://example.com/sse");
    }

    #[test]
    fn test_server_without_packages_or_remotes_is_rejected() {
        let info = server(json!({"id": "x", "name": "empty"}));
        assert!(matches!(server_entry(&info), Err(AwdError::Config(_))));
    }

    #[test]
    fn test_docker_and_uvx_hints() {
        let docker = server(json!({
            "id": "d", "name": "d",
            "packages": [{"name": "ghcr.io/acme/mcp", "runtime_hint": "docker"}]
        }));
        assert_eq!(
            server_entry(&docker).unwrap()["args"],
            json!(["run", "-i", "--rm", "ghcr.io/acme/mcp"])
        );

        let uvx = server(json!({
            "id": "u", "name": "u",
            "packages": [{"name": "mcp-server-time", "runtime_hint": "uvx"}]
        }));
        assert_eq!(server_entry(&uvx).unwrap()["command"], "uvx");
    }
}
