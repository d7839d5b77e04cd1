//! MCP server registry access.
//!
//! `ServerRegistry` is the seam the dependency pipeline talks to;
//! `RegistryClient` is the HTTP implementation against `/v0/servers`.

pub mod client;
pub mod types;

pub use client::{RegistryClient, ServerRegistry, DEFAULT_REGISTRY_URL, REGISTRY_URL_ENV};
pub use types::{Package, Remote, ServerInfo, ServerList};
