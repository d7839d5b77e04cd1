//! Prompt compiler: turns `*.prompt.md` references inside a script command
//! into rendered text files.
//!
//! A prompt template is Markdown with optional YAML frontmatter and
//! `{{name}}` placeholders:
//!
//! ```markdown
//! ---
//! description: Say hello
//! mcp:
//!   - github
//! ---
//! Hello {{name}}, please review {{repo}}.
//! ```
//!
//! `codex main.prompt.md` with `name=Ada` becomes
//! `codex .awd/compiled/main.txt`, where the output holds the body with the
//! known placeholders substituted. Unknown placeholders are left verbatim.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{AwdError, Result};

/// File-name suffix that marks a prompt template.
pub const PROMPT_SUFFIX: &str = ".prompt.md";

/// Project-relative directory receiving compiled prompts.
pub const COMPILED_DIR: &str = ".awd/compiled";

/// Extension of compiled prompt files.
const COMPILED_EXT: &str = "txt";

// ─── Frontmatter ─────────────────────────────────────────────────────────

/// Metadata block at the top of a prompt template.
#[derive(Debug, Default, Deserialize)]
pub struct PromptFrontmatter {
    #[serde(default)]
    pub description: Option<String>,
    /// MCP servers the prompt needs at run time
    #[serde(default)]
    pub mcp: Vec<String>,
}

/// Split `content` into (frontmatter, body). Content without a leading
/// `---` block has no frontmatter and is returned whole as the body.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = text.strip_prefix("---") else {
        return (None, content);
    };
    if !(rest.starts_with('\n') || rest.starts_with("\r\n")) {
        return (None, content);
    }
    match rest.find("\n---") {
        Some(end) => {
            let frontmatter = &rest[..end];
            let after = &rest[end + "\n---".len()..];
            let body = after
                .strip_prefix("\r\n")
                .or_else(|| after.strip_prefix('\n'))
                .unwrap_or(after);
            (Some(frontmatter), body)
        }
        None => (None, content),
    }
}

/// Parse the frontmatter of a prompt template (empty when absent).
pub fn parse_frontmatter(content: &str) -> Result<PromptFrontmatter> {
    match split_frontmatter(content) {
        (Some(fm), _) if !fm.trim().is_empty() => serde_yaml::from_str(fm)
            .map_err(|e| AwdError::Config(format!("Invalid prompt frontmatter: {}", e))),
        _ => Ok(PromptFrontmatter::default()),
    }
}

// ─── Rendering ───────────────────────────────────────────────────────────

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("placeholder pattern is valid"))
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""[^"]*"|'[^']*'|\S+"#).expect("token pattern is valid"))
}

/// Substitute `{{name}}` placeholders in one pass. Placeholders with no
/// matching parameter stay as written.
pub fn render(template: &str, params: &IndexMap<String, String>) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures| match params.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

// ─── Command scanning ────────────────────────────────────────────────────

/// A prompt-template token found in a command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptReference {
    /// Byte range of the whole token (including quotes) in the command
    pub span: Range<usize>,
    /// Referenced path, quotes removed
    pub path: String,
    /// Quote character wrapping the token, if any
    pub quote: Option<char>,
}

/// Find every whitespace-delimited (quote-aware) token ending in `.prompt.md`.
pub fn find_prompt_references(command: &str) -> Vec<PromptReference> {
    token_re()
        .find_iter(command)
        .filter_map(|m| {
            let raw = m.as_str();
            let (path, quote) = unquote(raw);
            path.ends_with(PROMPT_SUFFIX).then(|| PromptReference {
                span: m.range(),
                path: path.to_string(),
                quote,
            })
        })
        .collect()
}

fn unquote(token: &str) -> (&str, Option<char>) {
    for q in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(q) && token.ends_with(q) {
            return (&token[1..token.len() - 1], Some(q));
        }
    }
    (token, None)
}

/// Output file name for a template: `docs/review.prompt.md` → `review.txt`.
pub fn compiled_file_name(template: &str) -> String {
    let file_name = Path::new(template)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| template.to_string());
    let stem = file_name
        .strip_suffix(PROMPT_SUFFIX)
        .unwrap_or(&file_name)
        .to_string();
    format!("{}.{}", stem, COMPILED_EXT)
}

/// Two different templates in one command must not share an output file.
fn check_output_collisions(references: &[PromptReference]) -> Result<()> {
    let mut outputs: HashMap<String, &str> = HashMap::new();
    for reference in references {
        let output = compiled_file_name(&reference.path);
        match outputs.get(output.as_str()) {
            Some(previous) if *previous != reference.path => {
                return Err(AwdError::Config(format!(
                    "Prompt files '{}' and '{}' both compile to {}/{}",
                    previous, reference.path, COMPILED_DIR, output
                )));
            }
            Some(_) => {}
            None => {
                outputs.insert(output, &reference.path);
            }
        }
    }
    Ok(())
}

// ─── Compiler ────────────────────────────────────────────────────────────

/// One template that was rendered during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPrompt {
    /// Template path as written in the command
    pub source: String,
    /// Where the rendered text was written
    pub output: PathBuf,
}

/// Result of compiling a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCommand {
    pub command: String,
    pub prompts: Vec<CompiledPrompt>,
}

impl CompiledCommand {
    /// False when the command referenced no prompt templates.
    pub fn is_compiled(&self) -> bool {
        !self.prompts.is_empty()
    }
}

/// Renders prompt templates referenced by commands into `.awd/compiled/`.
pub struct PromptCompiler {
    project_root: PathBuf,
    output_dir: PathBuf,
}

impl PromptCompiler {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let output_dir = project_root.join(COMPILED_DIR);
        Self {
            project_root,
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Compile every prompt reference in `command` and rewrite the command
    /// to point at the compiled outputs. Other tokens pass through untouched.
    pub fn compile(
        &self,
        command: &str,
        params: &IndexMap<String, String>,
    ) -> Result<CompiledCommand> {
        let references = find_prompt_references(command);
        if references.is_empty() {
            return Ok(CompiledCommand {
                command: command.to_string(),
                prompts: Vec::new(),
            });
        }

        check_output_collisions(&references)?;

        let mut rewritten = String::with_capacity(command.len());
        let mut last = 0;
        let mut seen = HashSet::new();
        let mut prompts = Vec::new();

        for reference in &references {
            let output = self.compile_file(&reference.path, params)?;
            if seen.insert(reference.path.clone()) {
                prompts.push(CompiledPrompt {
                    source: reference.path.clone(),
                    output: output.clone(),
                });
            }

            let replacement = Path::new(COMPILED_DIR)
                .join(compiled_file_name(&reference.path))
                .to_string_lossy()
                .to_string();
            rewritten.push_str(&command[last..reference.span.start]);
            match reference.quote {
                Some(q) => {
                    rewritten.push(q);
                    rewritten.push_str(&replacement);
                    rewritten.push(q);
                }
                None => rewritten.push_str(&replacement),
            }
            last = reference.span.end;
        }
        rewritten.push_str(&command[last..]);

        tracing::debug!(
            "[PromptCompiler] '{}' -> '{}' ({} prompt(s))",
            command,
            rewritten,
            prompts.len()
        );
        Ok(CompiledCommand {
            command: rewritten,
            prompts,
        })
    }

    /// Render one template (path relative to the project root) and return
    /// the path of the written output.
    pub fn compile_file(
        &self,
        template: &str,
        params: &IndexMap<String, String>,
    ) -> Result<PathBuf> {
        let source = self.project_root.join(template);
        if !source.is_file() {
            return Err(AwdError::PromptNotFound(source));
        }
        let content = std::fs::read_to_string(&source)?;
        let (_, body) = split_frontmatter(&content);
        let rendered = render(body, params);

        std::fs::create_dir_all(&self.output_dir)?;
        let output = self.output_dir.join(compiled_file_name(template));
        std::fs::write(&output, rendered)?;
        tracing::info!(
            "[PromptCompiler] Compiled {} -> {}",
            template,
            output.display()
        );
        Ok(output)
    }
}
