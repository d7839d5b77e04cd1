//! AWD Core: dependency resolution and script execution for agentic workflows.
//!
//! This crate holds everything that decides *what* happens when a user runs
//! `awd install`, `awd run` or `awd preview`. It never prints; every
//! operation returns structured data for the CLI (or any other frontend) to
//! render.
//!
//! # Pipelines
//!
//! ```text
//! install:  awd.yml + *.prompt.md ──► WorkflowScanner ──► DependencyAggregator
//!                                                              │
//!                         RegistryClient ◄── DependencyVerifier ┘
//!                                                │
//!                                        PackageInstaller ──► client config
//!
//! run:      script name ──► ScriptRunner ──► PromptCompiler ──► shell (+ managed runtimes on PATH)
//! ```

pub mod client;
pub mod deps;
pub mod error;
pub mod manifest;
pub mod prompt;
pub mod registry;
pub mod runtime;
pub mod script;
pub mod shell_env;

// Convenience re-exports
pub use error::{AwdError, Result};
pub use manifest::{Manifest, ScriptDefinition, MANIFEST_FILE};
pub use prompt::{CompiledCommand, PromptCompiler};
pub use registry::{RegistryClient, ServerInfo, ServerRegistry};
pub use runtime::{RuntimeKind, RuntimeManager, RuntimeRecord};
pub use script::{parse_params, CommandExecutor, Preview, RunOutcome, ScriptRunner, ShellExecutor};
