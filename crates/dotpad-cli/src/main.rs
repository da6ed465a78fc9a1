use anyhow::Result;
use clap::{Parser, Subcommand};
use dotpad_core::LayoutEngine;
use dotpad_infrastructure::{ConfigService, DotpadPaths};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DOTPAD_LOG";

#[derive(Parser)]
#[command(name = "dotpad")]
#[command(about = "dotpad - Graphviz DOT diagram editor tools", long_about = None)]
struct Cli {
    /// Directory holding config.toml and drafts.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level unless DOTPAD_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a DOT file to SVG
    Render {
        file: PathBuf,
        /// Layout engine (dot, neato, fdp, sfdp, circo, twopi, osage, patchwork)
        #[arg(short, long)]
        engine: Option<String>,
        /// Write the SVG here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a DOT file and report the first error
    Lint {
        file: PathBuf,
        #[arg(short, long)]
        engine: Option<String>,
    },
    /// Inspect or manage autosaved drafts
    Drafts {
        #[command(subcommand)]
        action: DraftsAction,
    },
}

#[derive(Subcommand)]
enum DraftsAction {
    /// Show the recoverable draft, if any
    Show {
        /// Print the draft as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete every stored draft
    Clear,
    /// Restore the stored draft into files under a directory
    Recover {
        /// Directory to write recovered documents into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Recover without asking
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn engine_or_default(engine: Option<&str>, fallback: LayoutEngine) -> LayoutEngine {
    engine.map(LayoutEngine::parse_or_default).unwrap_or(fallback)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = DotpadPaths::new(cli.data_dir);
    let config = ConfigService::new(paths.clone()).get_config();

    match cli.command {
        Commands::Render {
            file,
            engine,
            output,
        } => {
            let engine = engine_or_default(engine.as_deref(), config.default_engine);
            commands::render::run(&config, &file, engine, output.as_deref()).await?
        }
        Commands::Lint { file, engine } => {
            let engine = engine_or_default(engine.as_deref(), config.default_engine);
            commands::lint::run(&config, &file, engine).await?
        }
        Commands::Drafts { action } => match action {
            DraftsAction::Show { json } => commands::drafts::show(&paths, json).await?,
            DraftsAction::Clear => commands::drafts::clear(&paths).await?,
            DraftsAction::Recover { out_dir, yes } => {
                commands::drafts::recover(&paths, &config, &out_dir, yes).await?
            }
        },
    }

    Ok(())
}
