//! `awd run` and `awd preview`.

use awd_core::{parse_params, AwdError, ScriptRunner};
use indexmap::IndexMap;

use super::{print_json, Context};
use crate::theme::Theme;

/// `awd run [script] [-p name=value]...`
pub fn run(ctx: &Context, script: Option<&str>, raw_params: &[String]) -> Result<(), String> {
    let root = ctx.project_root()?;
    let runner = ScriptRunner::new(&root).with_runtime_manager(ctx.runtime_manager()?);
    let params = parse_params(raw_params);

    if !ctx.json {
        println!(
            "{}",
            Theme::info(&format!("Running script: {}", script.unwrap_or("start")))
        );
        print_params(&params);
    }

    let outcome = runner
        .run_script(script, &params)
        .map_err(|e| report_error(ctx, e))?;

    if ctx.json {
        print_json(&outcome)?;
    } else {
        println!();
        println!("{}", Theme::success("Script executed successfully"));
    }
    Ok(())
}

/// `awd preview [script] [-p name=value]...`
pub fn preview(ctx: &Context, script: Option<&str>, raw_params: &[String]) -> Result<(), String> {
    let root = ctx.project_root()?;
    let runner = ScriptRunner::new(&root);
    let params = parse_params(raw_params);

    let preview = runner
        .preview_script(script, &params)
        .map_err(|e| report_error(ctx, e))?;

    if ctx.json {
        return print_json(&preview);
    }

    println!("{}", Theme::info(&format!("Previewing script: {}", preview.script_name)));
    print_params(&params);
    println!("{}", Theme::header("Original command"));
    println!("  {}", preview.original);

    if preview.is_compiled() {
        println!("{}", Theme::header("Compiled command"));
        println!("  {}", preview.compiled);
        println!("{}", Theme::header("Compiled prompt files"));
        for prompt in &preview.prompts {
            println!("  {} -> {}", prompt.source, prompt.output.display());
        }
    } else {
        println!("{}", Theme::header("Command (no prompt compilation)"));
        println!("  {}", preview.compiled);
        println!(
            "{}",
            Theme::warning("No .prompt.md files found in command; it runs as-is")
        );
    }

    println!();
    println!(
        "{}",
        Theme::success(&format!(
            "Preview complete. Use 'awd run {}' to execute.",
            preview.script_name
        ))
    );
    Ok(())
}

fn print_params(params: &IndexMap<String, String>) {
    for (name, value) in params {
        println!("  {}", Theme::dimmed(&format!("- {}: {}", name, value)));
    }
}

/// Print extra context for errors that carry it, then hand back the message.
fn report_error(ctx: &Context, err: AwdError) -> String {
    if let AwdError::NoScriptSpecified { available } = &err {
        if !ctx.json {
            println!("{}", Theme::info("Available scripts:"));
            for (name, command) in available {
                println!("  - {}: {}", Theme::highlight(name), command);
            }
        }
    }
    err.to_string()
}
