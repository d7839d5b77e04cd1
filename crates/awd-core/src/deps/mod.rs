//! Dependency management: scan, aggregate, verify, install.
//!
//! ```text
//! WorkflowScanner ──► DependencyAggregator ──► DependencyVerifier ──► PackageInstaller
//!  (awd.yml +          (dedupe by name,          (InstallPlan:           (one client
//!   *.prompt.md)        keep provenance)          installed/installable/   config write
//!                                                 not_found)               per entry)
//! ```
//!
//! Verification never installs anything; `install_dependencies` is the
//! explicit step that drives the plan.

pub mod aggregator;
pub mod installer;
pub mod scanner;
pub mod verifier;

use std::path::Path;

pub use aggregator::{scan_workflows_for_dependencies, sync_workflow_dependencies, DependencyAggregator};
pub use installer::{install_plan, InstallOutcome, InstallReport, InstallResult, PackageInstaller};
pub use scanner::{ArtifactKind, DependencyKind, DependencyRequirement, WorkflowArtifact, WorkflowScanner};
pub use verifier::{DependencyVerifier, InstallPlan, InstallPlanEntry, PlanStatus};

use crate::client::ClientAdapter;
use crate::error::Result;
use crate::registry::ServerRegistry;

/// Scan the project and classify every requirement against `client`.
pub fn verify_dependencies(
    project_root: &Path,
    client: &dyn ClientAdapter,
    registry: &dyn ServerRegistry,
) -> Result<InstallPlan> {
    let deps = scan_workflows_for_dependencies(project_root)?;
    DependencyVerifier::new(registry, client).verify(&deps)
}

/// Scan, verify, then install every `installable` entry.
///
/// Individual install failures are recorded in the report; only failures
/// that prevent building the plan are returned as errors.
pub fn install_dependencies(
    project_root: &Path,
    client: &dyn ClientAdapter,
    registry: &dyn ServerRegistry,
) -> Result<(InstallPlan, InstallReport)> {
    let plan = verify_dependencies(project_root, client, registry)?;
    let report = install_plan(&plan, &PackageInstaller::new(client));
    Ok((plan, report))
}
