//! MCP registry client (blocking HTTP).
//!
//! Lookup strategy for `find_server_by_reference`:
//!   1. reference shaped like a server id (36 chars, 4 hyphens) → `GET /v0/servers/{id}`
//!   2. otherwise, or if (1) fails → exact name scan over one `GET /v0/servers` page
//!
//! `search_servers` filters one unpaginated listing client-side, so
//! registries larger than one page are only partially searched.

use reqwest::StatusCode;

use super::types::{ServerInfo, ServerList};
use crate::error::{AwdError, Result};

pub const DEFAULT_REGISTRY_URL: &str = "https://demo.registry.azure-mcp.net";

/// Environment variable that overrides the registry base URL.
pub const REGISTRY_URL_ENV: &str = "MCP_REGISTRY_URL";

/// Page size used by the unpaginated helpers.
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Read-only view of a server registry.
///
/// Implementors provide the two raw endpoints; the search and lookup
/// strategies are shared.
pub trait ServerRegistry {
    /// One page of servers plus the cursor for the next page, if any.
    fn list_servers(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<(Vec<ServerInfo>, Option<String>)>;

    /// Fetch a single server by id. Unknown ids are `AwdError::NotFound`.
    fn get_server_info(&self, server_id: &str) -> Result<ServerInfo>;

    /// Servers whose name or description contains `query` (case-insensitive).
    fn search_servers(&self, query: &str) -> Result<Vec<ServerInfo>> {
        let (servers, _) = self.list_servers(Some(DEFAULT_PAGE_SIZE), None)?;
        Ok(servers
            .into_iter()
            .filter(|s| s.matches_query(query))
            .collect())
    }

    /// Exact name lookup, returning the full record of the first match.
    fn get_server_by_name(&self, name: &str) -> Result<Option<ServerInfo>> {
        let (servers, _) = self.list_servers(Some(DEFAULT_PAGE_SIZE), None)?;
        match servers.iter().find(|s| s.name == name) {
            Some(server) => self.get_server_info(&server.id).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve a dependency reference (server id or exact name).
    ///
    /// `Ok(None)` means the registry has no such server; only failures of the
    /// listing request itself are returned as errors.
    fn find_server_by_reference(&self, reference: &str) -> Result<Option<ServerInfo>> {
        if looks_like_server_id(reference) {
            match self.get_server_info(reference) {
                Ok(server) => return Ok(Some(server)),
                Err(e) => {
                    tracing::debug!(
                        "[RegistryClient] Direct lookup of '{}' failed, falling back to name scan: {}",
                        reference,
                        e
                    );
                }
            }
        }

        let (servers, _) = self.list_servers(Some(DEFAULT_PAGE_SIZE), None)?;
        for server in servers.iter().filter(|s| s.name == reference) {
            match self.get_server_info(&server.id) {
                Ok(full) => return Ok(Some(full)),
                Err(e) => {
                    tracing::warn!(
                        "[RegistryClient] Could not fetch details for '{}' ({}): {}",
                        server.name,
                        server.id,
                        e
                    );
                }
            }
        }

        Ok(None)
    }
}

/// True when `reference` has the shape of a registry id (hyphenated UUID).
pub fn looks_like_server_id(reference: &str) -> bool {
    reference.chars().count() == 36 && reference.matches('-').count() == 4
}

/// HTTP client for a registry exposing the `/v0/servers` API.
pub struct RegistryClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl RegistryClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("awd/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Use `url` if given, else `MCP_REGISTRY_URL`, else the demo registry.
    pub fn from_env(url: Option<String>) -> Result<Self> {
        let base = url
            .or_else(|| std::env::var(REGISTRY_URL_ENV).ok())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());
        Self::new(base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ServerRegistry for RegistryClient {
    fn list_servers(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<(Vec<ServerInfo>, Option<String>)> {
        let url = format!("{}/v0/servers", self.base_url);
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        tracing::debug!("[RegistryClient] GET {} {:?}", url, query);
        let resp = self.http.get(&url).query(&query).send()?;
        if !resp.status().is_success() {
            return Err(AwdError::Transport(format!(
                "registry returned HTTP {} for {}",
                resp.status(),
                url
            )));
        }

        let list: ServerList = resp
            .json()
            .map_err(|e| AwdError::Transport(format!("invalid server list from {}: {}", url, e)))?;
        Ok((list.servers, list.metadata.next_cursor))
    }

    fn get_server_info(&self, server_id: &str) -> Result<ServerInfo> {
        let url = format!("{}/v0/servers/{}", self.base_url, server_id);
        tracing::debug!("[RegistryClient] GET {}", url);

        let resp = self.http.get(&url).send()?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AwdError::NotFound(format!(
                "Server '{}' not found in registry",
                server_id
            )));
        }
        if !status.is_success() {
            return Err(AwdError::Transport(format!(
                "registry returned HTTP {} for {}",
                status, url
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .map_err(|e| AwdError::Transport(format!("invalid server record from {}: {}", url, e)))?;
        let empty = body.is_null() || body.as_object().is_some_and(|o| o.is_empty());
        if empty {
            return Err(AwdError::NotFound(format!(
                "Server '{}' not found in registry",
                server_id
            )));
        }

        serde_json::from_value(body)
            .map_err(|e| AwdError::Transport(format!("invalid server record from {}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const SERVER_ID: &str = "0a1b2c3d-1111-2222-3333-444455556666";

    fn server(id: &str, name: &str, description: &str) -> ServerInfo {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": name, "description": description
        }))
        .unwrap()
    }

    /// In-memory registry that records every call.
    struct FakeRegistry {
        servers: Vec<ServerInfo>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeRegistry {
        fn new(servers: Vec<ServerInfo>) -> Self {
            Self {
                servers,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ServerRegistry for FakeRegistry {
        fn list_servers(
            &self,
            _limit: Option<u32>,
            _cursor: Option<&str>,
        ) -> Result<(Vec<ServerInfo>, Option<String>)> {
            self.calls.borrow_mut().push("list".into());
            Ok((self.servers.clone(), None))
        }

        fn get_server_info(&self, server_id: &str) -> Result<ServerInfo> {
            self.calls.borrow_mut().push(format!("get:{}", server_id));
            self.servers
                .iter()
                .find(|s| s.id == server_id)
                .cloned()
                .ok_or_else(|| AwdError::NotFound(server_id.to_string()))
        }
    }

    #[test]
    fn test_looks_like_server_id() {
        assert!(looks_like_server_id(SERVER_ID));
        assert!(!looks_like_server_id("github"));
        assert!(!looks_like_server_id("0a1b2c3d11112222333344445555666677778888"));
        assert!(!looks_like_server_id("0a1b2c3d-1111-2222-3333-44445555666"));
    }

    #[test]
    fn test_id_shaped_reference_tries_direct_lookup_first() {
        // A server whose *name* equals the id-shaped reference also exists.
        let registry = FakeRegistry::new(vec![
            server(SERVER_ID, "by-id", ""),
            server("other", SERVER_ID, ""),
        ]);
        let found = registry.find_server_by_reference(SERVER_ID).unwrap().unwrap();
        assert_eq!(found.name, "by-id");
        assert_eq!(registry.calls.borrow()[0], format!("get:{}", SERVER_ID));
        assert_eq!(registry.calls.borrow().len(), 1);
    }

    #[test]
    fn test_failed_direct_lookup_falls_back_to_name_scan() {
        let registry = FakeRegistry::new(vec![server("other", SERVER_ID, "")]);
        let found = registry.find_server_by_reference(SERVER_ID).unwrap().unwrap();
        assert_eq!(found.id, "other");
        let calls = registry.calls.borrow();
        assert_eq!(calls[0], format!("get:{}", SERVER_ID));
        assert_eq!(calls[1], "list");
    }

    #[test]
    fn test_name_reference_skips_direct_lookup() {
        let registry = FakeRegistry::new(vec![server("id-1", "github", "")]);
        let found = registry.find_server_by_reference("github").unwrap().unwrap();
        assert_eq!(found.id, "id-1");
        assert_eq!(registry.calls.borrow().as_slice(), ["list", "get:id-1"]);
    }

    #[test]
    fn test_unknown_reference_is_none() {
        let registry = FakeRegistry::new(vec![server("id-1", "github", "")]);
        assert!(registry.find_server_by_reference("gitlab").unwrap().is_none());
        assert!(registry.get_server_by_name("gitlab").unwrap().is_none());
    }

    #[test]
    fn test_search_filters_name_and_description() {
        let registry = FakeRegistry::new(vec![
            server("1", "github", "Repository tools"),
            server("2", "filesystem", "Local FILE access"),
            server("3", "slack", "Chat"),
        ]);
        let names: Vec<_> = registry
            .search_servers("file")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["filesystem"]);

        let names: Vec<_> = registry
            .search_servers("REPO")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["github"]);
    }

    #[test]
    fn test_from_env_prefers_explicit_url() {
        let client = RegistryClient::from_env(Some("http://localhost:9/".into())).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9");
    }
}
