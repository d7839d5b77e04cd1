//! `awd mcp`: read-only registry browsing.

use awd_core::registry::{ServerInfo, ServerRegistry};

use super::{print_json, Context};
use crate::theme::Theme;

pub fn list(ctx: &Context, limit: Option<u32>, cursor: Option<&str>) -> Result<(), String> {
    let registry = ctx.registry()?;
    let (servers, next) = registry
        .list_servers(limit, cursor)
        .map_err(|e| e.to_string())?;

    if ctx.json {
        return print_json(&serde_json::json!({ "servers": servers, "next_cursor": next }));
    }
    print_servers(&servers);
    if let Some(next) = next {
        println!();
        println!("{}", Theme::dimmed(&format!("More results: --cursor {}", next)));
    }
    Ok(())
}

pub fn search(ctx: &Context, query: &str) -> Result<(), String> {
    let registry = ctx.registry()?;
    let servers = registry.search_servers(query).map_err(|e| e.to_string())?;

    if ctx.json {
        return print_json(&servers);
    }
    if servers.is_empty() {
        println!("{}", Theme::warning(&format!("No servers match '{}'", query)));
        return Ok(());
    }
    print_servers(&servers);
    Ok(())
}

pub fn show(ctx: &Context, reference: &str) -> Result<(), String> {
    let registry = ctx.registry()?;
    let server = registry
        .find_server_by_reference(reference)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Server '{}' not found in registry", reference))?;

    if ctx.json {
        return print_json(&server);
    }

    println!("{}", Theme::header(&server.name));
    println!("  ID:          {}", server.id);
    if !server.description.is_empty() {
        println!("  Description: {}", server.description);
    }
    for pkg in &server.packages {
        println!(
            "  Package:     {} {} ({})",
            pkg.name,
            pkg.version.as_deref().unwrap_or("latest"),
            pkg.runtime_hint
                .as_deref()
                .or(pkg.registry_name.as_deref())
                .unwrap_or("unknown")
        );
    }
    for remote in &server.remotes {
        println!("  Remote:      {} {}", remote.transport_type, remote.url);
    }
    Ok(())
}

fn print_servers(servers: &[ServerInfo]) {
    let width = servers.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for server in servers {
        println!(
            "  {:<width$}  {}",
            server.name,
            Theme::dimmed(&server.description),
            width = width
        );
    }
}
