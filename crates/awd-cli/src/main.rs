//! AWD CLI: package manager for agentic workflow definitions.
//!
//! Thin presentation layer over `awd-core`: every command loads what it
//! needs from the project directory, calls the core, and renders the result.

mod commands;
mod theme;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use awd_core::client::DEFAULT_CLIENT;

/// AWD: install MCP dependencies and run prompt-driven workflows
#[derive(Parser)]
#[command(name = "awd", version, about = "AWD: Agentic Workflow Definitions package manager")]
pub struct Cli {
    /// Project directory containing awd.yml (defaults to the current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// MCP registry base URL
    #[arg(long, global = true, env = "MCP_REGISTRY_URL")]
    registry_url: Option<String>,

    /// Directory holding AWD-managed runtimes (defaults to ~/.awd/runtimes)
    #[arg(long, global = true, env = "AWD_RUNTIME_DIR")]
    runtime_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of status lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install MCP dependencies declared by the workflow
    Install {
        /// Client to install servers into
        #[arg(long, default_value = DEFAULT_CLIENT)]
        client: String,
    },

    /// Run a script from awd.yml ('start' when no name is given)
    Run {
        /// Script name
        script: Option<String>,
        /// Parameter in the form name=value (repeatable)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },

    /// Compile a script's prompt files without executing it
    Preview {
        /// Script name
        script: Option<String>,
        /// Parameter in the form name=value (repeatable)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },

    /// List scripts defined in awd.yml
    List,

    /// Show AWD configuration
    Config {
        /// Show the current configuration
        #[arg(long)]
        show: bool,
    },

    /// Inspect and maintain workflow dependencies
    Deps {
        #[command(subcommand)]
        action: DepsAction,
    },

    /// Browse the MCP registry
    Mcp {
        #[command(subcommand)]
        action: McpAction,
    },

    /// Manage AI runtimes
    Runtime {
        #[command(subcommand)]
        action: RuntimeAction,
    },
}

#[derive(Subcommand)]
enum DepsAction {
    /// List every required MCP server and where it is declared
    List,
    /// Verify dependencies against the registry without installing
    Check {
        /// Client whose install state is checked
        #[arg(long, default_value = DEFAULT_CLIENT)]
        client: String,
    },
    /// Add dependencies found in prompt files to awd.yml
    Sync,
}

#[derive(Subcommand)]
enum McpAction {
    /// List servers in the registry
    List {
        /// Maximum number of servers to show
        #[arg(long)]
        limit: Option<u32>,
        /// Pagination cursor from a previous listing
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Search servers by name or description
    Search {
        query: String,
    },
    /// Show one server by id or exact name
    Show {
        reference: String,
    },
}

#[derive(Subcommand)]
enum RuntimeAction {
    /// Set up a runtime
    Setup {
        /// Runtime name: codex or llm
        name: String,
        /// Version to install
        #[arg(long)]
        version: Option<String>,
        /// Install without AWD configuration (runtime defaults)
        #[arg(long)]
        vanilla: bool,
    },
    /// List supported runtimes and their install state
    List,
    /// Remove an AWD-managed runtime
    Remove {
        /// Runtime name: codex or llm
        name: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show which runtime will be used
    Status,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing (stderr; stdout is for command output)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "awd_core=warn,awd=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = commands::Context {
        project: cli.project,
        registry_url: cli.registry_url,
        runtime_dir: cli.runtime_dir,
        json: cli.json,
    };

    let result = match cli.command {
        Some(Commands::Install { client }) => commands::install::run(&ctx, &client),
        Some(Commands::Run { script, params }) => {
            commands::run::run(&ctx, script.as_deref(), &params)
        }
        Some(Commands::Preview { script, params }) => {
            commands::run::preview(&ctx, script.as_deref(), &params)
        }
        Some(Commands::List) => commands::list::run(&ctx),
        Some(Commands::Config { show }) => commands::config::run(&ctx, show),

        Some(Commands::Deps { action }) => match action {
            DepsAction::List => commands::deps::list(&ctx),
            DepsAction::Check { client } => commands::deps::check(&ctx, &client),
            DepsAction::Sync => commands::deps::sync(&ctx),
        },

        Some(Commands::Mcp { action }) => match action {
            McpAction::List { limit, cursor } => {
                commands::mcp::list(&ctx, limit, cursor.as_deref())
            }
            McpAction::Search { query } => commands::mcp::search(&ctx, &query),
            McpAction::Show { reference } => commands::mcp::show(&ctx, &reference),
        },

        Some(Commands::Runtime { action }) => match action {
            RuntimeAction::Setup {
                name,
                version,
                vanilla,
            } => commands::runtime::setup(&ctx, &name, version.as_deref(), vanilla),
            RuntimeAction::List => commands::runtime::list(&ctx),
            RuntimeAction::Remove { name, yes } => commands::runtime::remove(&ctx, &name, yes),
            RuntimeAction::Status => commands::runtime::status(&ctx),
        },

        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
