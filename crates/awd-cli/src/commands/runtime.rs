//! `awd runtime`: AI runtime management.
//!
//! Provides:
//!   - `awd runtime setup <name> [--version V] [--vanilla]`
//!   - `awd runtime list`
//!   - `awd runtime remove <name> [--yes]`
//!   - `awd runtime status`: which runtime `awd run` would pick

use awd_core::RuntimeKind;

use super::{print_json, Context};
use crate::theme::Theme;

fn parse_kind(name: &str) -> Result<RuntimeKind, String> {
    name.parse::<RuntimeKind>().map_err(|e| {
        let supported: Vec<&str> = RuntimeKind::ALL.iter().map(|k| k.name()).collect();
        format!("{}. Supported runtimes: {}", e, supported.join(", "))
    })
}

pub fn setup(ctx: &Context, name: &str, version: Option<&str>, vanilla: bool) -> Result<(), String> {
    let kind = parse_kind(name)?;
    let manager = ctx.runtime_manager()?;

    if !ctx.json {
        println!(
            "{}",
            Theme::info(&format!("Setting up {} runtime: {}", kind, kind.description()))
        );
        if vanilla {
            println!(
                "{}",
                Theme::warning("Vanilla mode: no AWD configuration will be applied")
            );
        } else {
            println!(
                "{}",
                Theme::info("Installing with AWD defaults (GitHub Models for free access)")
            );
        }
    }

    manager
        .setup_runtime(kind, version, vanilla)
        .map_err(|e| e.to_string())?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "runtime": kind,
            "version": version,
            "vanilla": vanilla,
            "installed": true,
        }));
    }
    println!("{}", Theme::success(&format!("{} runtime setup complete", kind)));
    Ok(())
}

pub fn list(ctx: &Context) -> Result<(), String> {
    let manager = ctx.runtime_manager()?;
    let records = manager.list_runtimes();

    if ctx.json {
        return print_json(&records);
    }

    println!("{}", Theme::header("AI runtimes"));
    for record in &records {
        let status = if record.installed {
            Theme::success("installed")
        } else {
            Theme::dimmed("not installed")
        };
        println!("  {}  {}", Theme::highlight(&record.name), status);
        println!("      {}", record.description);
        if let Some(path) = &record.install_path {
            let origin = if record.managed { "managed" } else { "system" };
            println!("      Path:    {} ({})", path.display(), origin);
        }
        if let Some(version) = &record.version {
            println!("      Version: {}", version);
        }
    }
    Ok(())
}

pub fn remove(ctx: &Context, name: &str, yes: bool) -> Result<(), String> {
    let kind = parse_kind(name)?;
    let manager = ctx.runtime_manager()?;

    if !yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Remove the {} runtime?", kind))
            .default(false)
            .interact()
            .map_err(|e| e.to_string())?;
        if !confirm {
            if ctx.json {
                return print_json(&serde_json::json!({ "runtime": kind, "removed": false }));
            }
            println!("{}", Theme::info("Aborted."));
            return Ok(());
        }
    }

    manager.remove_runtime(kind).map_err(|e| e.to_string())?;
    if ctx.json {
        return print_json(&serde_json::json!({ "runtime": kind, "removed": true }));
    }
    println!("{}", Theme::success(&format!("{} runtime removed", kind)));
    Ok(())
}

pub fn status(ctx: &Context) -> Result<(), String> {
    let manager = ctx.runtime_manager()?;
    let active = manager.get_available_runtime();
    let preference: Vec<&str> = manager
        .get_runtime_preference()
        .iter()
        .map(|k| k.name())
        .collect();

    if ctx.json {
        return print_json(&serde_json::json!({
            "preference": preference,
            "active": active,
            "runtime_dir": manager.runtime_dir(),
        }));
    }

    println!("{}", Theme::info(&format!("Preference order: {}", preference.join(" > "))));
    match active {
        Some(kind) => println!("{}", Theme::success(&format!("Active runtime: {}", kind))),
        None => {
            println!("{}", Theme::error("No runtimes available"));
            println!(
                "{}",
                Theme::info("Run 'awd runtime setup codex' to install the primary runtime")
            );
        }
    }
    Ok(())
}
