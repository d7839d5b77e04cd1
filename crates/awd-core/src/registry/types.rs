//! Wire types for the MCP registry API (`/v0/servers`).

use serde::{Deserialize, Serialize};

/// One server record as returned by the registry.
///
/// Fields the core does not interpret are kept in `extra` so the record can
/// be shown verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<Package>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<Remote>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A distributable package of a server (npm, pypi, docker, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// How the package is launched: "npx", "uvx", "docker", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_hint: Option<String>,
}

/// A hosted endpoint of a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remote {
    /// "sse" or "streamable-http"
    #[serde(default)]
    pub transport_type: String,
    pub url: String,
}

/// Body of `GET /v0/servers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerList {
    #[serde(default)]
    pub servers: Vec<ServerInfo>,
    #[serde(default)]
    pub metadata: ListMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl ServerInfo {
    /// Case-insensitive substring match on name or description.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q) || self.description.to_lowercase().contains(&q)
    }
}
