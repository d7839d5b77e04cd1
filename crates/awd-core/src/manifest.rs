//! Project manifest (`awd.yml`) schema.
//!
//! ```yaml
//! name: "hello-world"
//! version: "1.0.0"
//! description: "A hello world AWD project"
//! author: "Ada"
//! entrypoint: "hello-world.prompt.md"
//!
//! dependencies:
//!   mcp:
//!     - ghcr.io/github/github-mcp-server
//!
//! scripts:
//!   start: "codex hello-world.prompt.md"
//!   llm: "llm hello-world.prompt.md -m github/gpt-4o-mini"
//! ```
//!
//! The manifest is re-read on every command; nothing here is cached.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AwdError, Result};

/// File name of the manifest at the project root.
pub const MANIFEST_FILE: &str = "awd.yml";

/// Script run when no script name is given.
pub const DEFAULT_SCRIPT: &str = "start";

/// Top-level manifest loaded from `awd.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Main prompt file of the workflow, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,

    #[serde(default)]
    pub dependencies: Dependencies,

    /// Script name → shell command, in manifest order
    #[serde(default)]
    pub scripts: IndexMap<String, String>,
}

/// Declared dependencies, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependencies {
    /// MCP server references (registry names or ids)
    #[serde(default)]
    pub mcp: Vec<String>,
}

/// One entry of the manifest's script table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDefinition {
    pub name: String,
    pub command: String,
}

impl Manifest {
    /// Parse a manifest from a YAML string. An empty document is an empty manifest.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| AwdError::Config(format!("Failed to parse {}: {}", MANIFEST_FILE, e)))
    }

    /// Path of the manifest inside `project_root`.
    pub fn path_in(project_root: &Path) -> PathBuf {
        project_root.join(MANIFEST_FILE)
    }

    /// Load `awd.yml` from the project root.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = Self::path_in(project_root);
        if !path.is_file() {
            return Err(AwdError::ManifestNotFound(project_root.to_path_buf()));
        }
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    /// Write the manifest back to `awd.yml`.
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(Self::path_in(project_root), yaml)?;
        Ok(())
    }

    /// Scripts in manifest order.
    pub fn scripts(&self) -> Vec<ScriptDefinition> {
        self.scripts
            .iter()
            .map(|(name, command)| ScriptDefinition {
                name: name.clone(),
                command: command.clone(),
            })
            .collect()
    }

    /// Look up a script by name.
    pub fn script(&self, name: &str) -> Option<ScriptDefinition> {
        self.scripts.get(name).map(|command| ScriptDefinition {
            name: name.to_string(),
            command: command.clone(),
        })
    }

    /// `Some("start")` when the manifest defines a start script.
    pub fn default_script(&self) -> Option<&'static str> {
        self.scripts
            .contains_key(DEFAULT_SCRIPT)
            .then_some(DEFAULT_SCRIPT)
    }

    /// Declared MCP dependency references.
    pub fn mcp_dependencies(&self) -> &[String] {
        &self.dependencies.mcp
    }
}
