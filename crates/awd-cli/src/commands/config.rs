//! `awd config --show`

use awd_core::{AwdError, Manifest};

use super::{print_json, Context};
use crate::theme::Theme;

pub fn run(ctx: &Context, show: bool) -> Result<(), String> {
    if !show {
        println!("{}", Theme::info("Use --show to display configuration"));
        return Ok(());
    }

    let root = ctx.project_root()?;
    let manifest = match Manifest::load(&root) {
        Ok(m) => Some(m),
        Err(AwdError::ManifestNotFound(_)) => None,
        Err(e) => return Err(e.to_string()),
    };
    let registry = ctx.registry()?;
    let runtime_dir = ctx
        .runtime_manager()
        .map(|rm| rm.runtime_dir().display().to_string())
        .unwrap_or_else(|e| format!("unavailable ({})", e));

    if ctx.json {
        return print_json(&serde_json::json!({
            "project": manifest.as_ref().map(|m| serde_json::json!({
                "name": m.name,
                "version": m.version,
                "entrypoint": m.entrypoint,
                "mcp_dependencies": m.mcp_dependencies().len(),
            })),
            "registry_url": registry.base_url(),
            "runtime_dir": runtime_dir,
            "cli_version": env!("CARGO_PKG_VERSION"),
        }));
    }

    println!("{}", Theme::header("Current AWD configuration"));
    match &manifest {
        Some(m) => {
            println!("{}", Theme::highlight("Project (awd.yml)"));
            println!("  Name:             {}", m.name.as_deref().unwrap_or("Unknown"));
            println!("  Version:          {}", m.version.as_deref().unwrap_or("Unknown"));
            println!("  Entrypoint:       {}", m.entrypoint.as_deref().unwrap_or("None"));
            println!("  MCP dependencies: {}", m.mcp_dependencies().len());
        }
        None => println!("{}", Theme::info("Not in an AWD project directory")),
    }
    println!("{}", Theme::highlight("Global"));
    println!("  AWD CLI version:  {}", env!("CARGO_PKG_VERSION"));
    println!("  Registry:         {}", registry.base_url());
    println!("  Runtime dir:      {}", runtime_dir);
    Ok(())
}
