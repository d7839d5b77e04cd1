//! `awd deps`: inspect and maintain workflow dependencies.
//!
//! Provides:
//!   - `awd deps list`: every requirement with the files that declare it
//!   - `awd deps check`: verification plan, no installs; exit 1 unless satisfied
//!   - `awd deps sync`: copy prompt-declared dependencies into awd.yml

use awd_core::client::client_for;
use awd_core::deps::{scan_workflows_for_dependencies, sync_workflow_dependencies, verify_dependencies, PlanStatus};

use super::{print_json, Context};
use crate::theme::Theme;

pub fn list(ctx: &Context) -> Result<(), String> {
    let root = ctx.project_root()?;
    let deps = scan_workflows_for_dependencies(&root).map_err(|e| e.to_string())?;

    if ctx.json {
        let entries: Vec<_> = deps
            .iter()
            .map(|(name, sources)| serde_json::json!({ "name": name, "sources": sources }))
            .collect();
        return print_json(&entries);
    }

    if deps.is_empty() {
        println!("{}", Theme::warning("No MCP dependencies found"));
        return Ok(());
    }
    println!(
        "{}",
        Theme::header(&format!("{} MCP dependenc{}", deps.len(), if deps.len() == 1 { "y" } else { "ies" }))
    );
    for (name, sources) in deps.iter() {
        let from: Vec<String> = sources.iter().map(|s| s.display().to_string()).collect();
        println!("  {}  {}", Theme::highlight(name), Theme::dimmed(&from.join(", ")));
    }
    Ok(())
}

pub fn check(ctx: &Context, client: &str) -> Result<(), String> {
    let root = ctx.project_root()?;
    let adapter = client_for(client, &root).map_err(|e| e.to_string())?;
    let registry = ctx.registry()?;
    let plan = verify_dependencies(&root, adapter.as_ref(), &registry).map_err(|e| e.to_string())?;

    if ctx.json {
        print_json(&plan)?;
    } else if plan.entries.is_empty() {
        println!("{}", Theme::warning("No MCP dependencies found"));
    } else {
        println!("{}", Theme::header(&format!("Dependency plan for {}", plan.client)));
        for entry in &plan.entries {
            let line = match entry.status {
                PlanStatus::AlreadyInstalled => Theme::success(&format!("{} installed", entry.name)),
                PlanStatus::Installable => Theme::warning(&format!("{} not installed (available)", entry.name)),
                PlanStatus::NotFound => match &entry.lookup_error {
                    Some(reason) => Theme::error(&format!("{} lookup failed: {}", entry.name, reason)),
                    None => Theme::error(&format!("{} not found in registry", entry.name)),
                },
            };
            println!("  {}", line);
        }
    }

    if plan.is_satisfied() {
        Ok(())
    } else {
        Err(format!(
            "{} installable, {} missing; run 'awd install'",
            plan.installable().len(),
            plan.missing().len()
        ))
    }
}

pub fn sync(ctx: &Context) -> Result<(), String> {
    let root = ctx.project_root()?;
    let added = sync_workflow_dependencies(&root).map_err(|e| e.to_string())?;

    if ctx.json {
        return print_json(&serde_json::json!({ "added": added }));
    }
    if added.is_empty() {
        println!("{}", Theme::success("awd.yml already lists every dependency"));
    } else {
        for name in &added {
            println!("  {}", Theme::success(&format!("added {}", name)));
        }
        println!("{}", Theme::success("Updated awd.yml"));
    }
    Ok(())
}
