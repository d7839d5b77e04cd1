//! Dependency verification: compare required servers with local and
//! registry state and produce an install plan. No side effects.

use std::path::PathBuf;

use serde::Serialize;

use super::aggregator::DependencyAggregator;
use crate::client::ClientAdapter;
use crate::error::Result;
use crate::registry::{ServerInfo, ServerRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Already configured in the target client
    AlreadyInstalled,
    /// Found in the registry, not yet configured
    Installable,
    /// Not found in the registry (or the lookup failed)
    NotFound,
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::AlreadyInstalled => write!(f, "already_installed"),
            PlanStatus::Installable => write!(f, "installable"),
            PlanStatus::NotFound => write!(f, "not_found"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallPlanEntry {
    pub name: String,
    /// Artifacts that requested this dependency
    pub sources: Vec<PathBuf>,
    pub registry_match: Option<ServerInfo>,
    pub status: PlanStatus,
    /// Set when the registry lookup itself failed for this entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallPlan {
    pub client: String,
    pub entries: Vec<InstallPlanEntry>,
}

impl InstallPlan {
    fn names_with(&self, status: PlanStatus) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.status == status)
            .map(|e| e.name.as_str())
            .collect()
    }

    pub fn installed(&self) -> Vec<&str> {
        self.names_with(PlanStatus::AlreadyInstalled)
    }

    pub fn installable(&self) -> Vec<&str> {
        self.names_with(PlanStatus::Installable)
    }

    pub fn missing(&self) -> Vec<&str> {
        self.names_with(PlanStatus::NotFound)
    }

    /// True when every dependency is already installed.
    pub fn is_satisfied(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.status == PlanStatus::AlreadyInstalled)
    }
}

pub struct DependencyVerifier<'a> {
    registry: &'a dyn ServerRegistry,
    client: &'a dyn ClientAdapter,
}

impl<'a> DependencyVerifier<'a> {
    pub fn new(registry: &'a dyn ServerRegistry, client: &'a dyn ClientAdapter) -> Self {
        Self { registry, client }
    }

    /// Classify every aggregated dependency.
    ///
    /// Local install state wins: an installed dependency is not looked up in
    /// the registry at all. A failed lookup marks only that entry `not_found`.
    pub fn verify(&self, deps: &DependencyAggregator) -> Result<InstallPlan> {
        let mut entries = Vec::with_capacity(deps.len());

        for (name, sources) in deps.iter() {
            let mut entry = InstallPlanEntry {
                name: name.to_string(),
                sources: sources.to_vec(),
                registry_match: None,
                status: PlanStatus::NotFound,
                lookup_error: None,
            };

            if self.client.is_installed(name)? {
                entry.status = PlanStatus::AlreadyInstalled;
            } else {
                match self.registry.find_server_by_reference(name) {
                    Ok(Some(server)) => {
                        entry.registry_match = Some(server);
                        entry.status = PlanStatus::Installable;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("[DependencyVerifier] Lookup of '{}' failed: {}", name, e);
                        entry.lookup_error = Some(e.to_string());
                    }
                }
            }

            tracing::debug!("[DependencyVerifier] {} -> {}", name, entry.status);
            entries.push(entry);
        }

        Ok(InstallPlan {
            client: self.client.name().to_string(),
            entries,
        })
    }
}
