//! `awd install [--client <id>]`
//!
//! 1. Scan awd.yml and referenced prompt files for MCP requirements.
//! 2. Verify each one against the client config and the registry.
//! 3. Install every installable entry, continuing past failures.

use awd_core::client::client_for;
use awd_core::deps::{install_dependencies, InstallOutcome};

use super::{print_json, Context};
use crate::theme::Theme;

pub fn run(ctx: &Context, client: &str) -> Result<(), String> {
    let root = ctx.project_root()?;
    let adapter = client_for(client, &root).map_err(|e| e.to_string())?;
    let registry = ctx.registry()?;

    if !ctx.json {
        println!(
            "{}",
            Theme::info(&format!("Installing dependencies for {}...", adapter.name()))
        );
    }

    let (plan, report) =
        install_dependencies(&root, adapter.as_ref(), &registry).map_err(|e| e.to_string())?;

    if ctx.json {
        print_json(&serde_json::json!({
            "client": plan.client,
            "plan": plan.entries,
            "results": report.results,
            "success": report.is_success(),
        }))?;
    } else if plan.entries.is_empty() {
        println!("{}", Theme::warning("No MCP dependencies found"));
    } else {
        for result in &report.results {
            let line = match &result.outcome {
                InstallOutcome::Installed => Theme::success(&format!("{} installed", result.name)),
                InstallOutcome::AlreadyInstalled => {
                    Theme::success(&format!("{} already installed", result.name))
                }
                InstallOutcome::NotFound(None) => {
                    Theme::error(&format!("{} not found in registry", result.name))
                }
                InstallOutcome::NotFound(Some(reason)) => Theme::error(&format!(
                    "{} could not be looked up: {}",
                    result.name, reason
                )),
                InstallOutcome::Failed(reason) => {
                    Theme::error(&format!("{} failed: {}", result.name, reason))
                }
            };
            println!("  {}", line);
        }
    }

    if !report.is_success() {
        return Err(format!(
            "{} of {} dependencies could not be installed",
            report.failed().len(),
            report.results.len()
        ));
    }
    if !ctx.json && !plan.entries.is_empty() {
        println!("{}", Theme::success("Dependencies installation complete"));
    }
    Ok(())
}
