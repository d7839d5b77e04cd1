//! `awd list`: scripts defined in awd.yml.

use awd_core::Manifest;

use super::{print_json, Context};
use crate::theme::Theme;

pub fn run(ctx: &Context) -> Result<(), String> {
    let root = ctx.project_root()?;
    let manifest = Manifest::load(&root).map_err(|e| e.to_string())?;
    let default = manifest.default_script();

    if ctx.json {
        return print_json(&serde_json::json!({
            "default": default,
            "scripts": manifest.scripts(),
        }));
    }

    if manifest.scripts.is_empty() {
        println!("{}", Theme::warning("No scripts found."));
        println!("{}", Theme::info("Add scripts to your awd.yml file:"));
        println!("scripts:");
        println!("  start: \"codex main.prompt.md\"");
        println!("  fast: \"llm prompt main.prompt.md -m github/gpt-4o-mini\"");
        return Ok(());
    }

    println!("{}", Theme::header("Available scripts"));
    let width = manifest.scripts.keys().map(|k| k.len()).max().unwrap_or(0);
    for script in manifest.scripts() {
        let marker = if Some(script.name.as_str()) == default { "*" } else { " " };
        let name = format!("{:<width$}", script.name, width = width);
        println!("  {} {}  {}", marker, Theme::highlight(&name), script.command);
    }
    if default.is_some() {
        println!();
        println!("{}", Theme::dimmed("* = default script (runs when no script name is given)"));
    }
    Ok(())
}
