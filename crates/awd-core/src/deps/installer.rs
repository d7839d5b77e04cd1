//! Package installer: apply an install plan to a client.

use serde::Serialize;

use super::verifier::{InstallPlan, PlanStatus};
use crate::client::ClientAdapter;
use crate::error::Result;
use crate::registry::ServerInfo;

/// What happened to one dependency during install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum InstallOutcome {
    Installed,
    AlreadyInstalled,
    /// Not in the registry; carries the lookup error if there was one
    NotFound(Option<String>),
    Failed(String),
}

impl InstallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InstallOutcome::Installed | InstallOutcome::AlreadyInstalled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallResult {
    pub name: String,
    pub outcome: InstallOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    pub results: Vec<InstallResult>,
}

impl InstallReport {
    pub fn succeeded(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.outcome.is_success())
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<&InstallResult> {
        self.results
            .iter()
            .filter(|r| !r.outcome.is_success())
            .collect()
    }

    /// True when every dependency ended up installed.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_success())
    }
}

/// Installs registry servers into one client.
pub struct PackageInstaller<'a> {
    client: &'a dyn ClientAdapter,
}

impl<'a> PackageInstaller<'a> {
    pub fn new(client: &'a dyn ClientAdapter) -> Self {
        Self { client }
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    /// Configure `server` under `name` in the client.
    pub fn install(&self, name: &str, server: &ServerInfo) -> Result<()> {
        tracing::info!(
            "[PackageInstaller] Installing '{}' into {}",
            name,
            self.client.name()
        );
        self.client.configure_server(name, server)
    }
}

/// Drive a plan entry by entry. A failing entry is recorded and the
/// remaining entries are still attempted.
pub fn install_plan(plan: &InstallPlan, installer: &PackageInstaller) -> InstallReport {
    let mut report = InstallReport::default();

    for entry in &plan.entries {
        let outcome = match (entry.status, entry.registry_match.as_ref()) {
            (PlanStatus::AlreadyInstalled, _) => InstallOutcome::AlreadyInstalled,
            (PlanStatus::Installable, Some(server)) => match installer.install(&entry.name, server) {
                Ok(()) => InstallOutcome::Installed,
                Err(e) => {
                    tracing::warn!("[PackageInstaller] Failed to install '{}': {}", entry.name, e);
                    InstallOutcome::Failed(e.to_string())
                }
            },
            (PlanStatus::Installable, None) => {
                InstallOutcome::Failed("no registry record for installable entry".to_string())
            }
            (PlanStatus::NotFound, _) => InstallOutcome::NotFound(entry.lookup_error.clone()),
        };
        report.results.push(InstallResult {
            name: entry.name.clone(),
            outcome,
        });
    }

    tracing::info!(
        "[PackageInstaller] {} of {} dependenc{} satisfied",
        report.succeeded().len(),
        report.results.len(),
        if report.results.len() == 1 { "y" } else { "ies" }
    );
    report
}
