use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backlog::backup;
use backlog::config::RuntimeConfig;
use backlog::doc::{emit, LoadContext};
use backlog::project::{assign_ids, dump_backlog, load_backlog};

#[derive(Parser)]
#[command(name = "blg")]
#[command(about = "Hierarchical product backlog kept in a YAML document")]
struct Cli {
    /// Backlog document path, overriding the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a story, top-level or under a parent story
    AddStory {
        title: String,

        /// Parent story identifier
        #[arg(long)]
        to: Option<String>,
    },
    /// Append a task under a story or task
    AddTask {
        title: String,

        /// Target story or task identifier
        #[arg(long)]
        to: String,
    },
    /// Mark a task complete (a story target gets a completion log)
    #[command(alias = "complete")]
    Done { id: String },
    /// Reload the document, fill in missing identifiers, rewrite it
    Rebuild,
}

/// Initialize tracing to stderr so stdout stays clean for command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "backlog=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("no command given; see `blg --help`");
        return ExitCode::from(1);
    };

    match run(command, cli.file.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("command failed: {err:#}");
            ExitCode::from(3)
        }
    }
}

fn run(command: Commands, file_override: Option<&Path>) -> Result<()> {
    let config = RuntimeConfig::load();
    let path = file_override
        .map(Path::to_path_buf)
        .or_else(|| config.document.clone())
        .context("no backlog document configured; pass --file or set it in the config")?;

    let doc = read_document(&path)?;
    let mut ctx = LoadContext::new();
    let mut backlog = load_backlog(&mut ctx, &doc)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    match command {
        Commands::AddStory { title, to } => {
            backlog.add_story(&mut ctx, &title, to.as_deref())?;
            tracing::info!("added story {title:?}");
        }
        Commands::AddTask { title, to } => {
            backlog.add_task(&mut ctx, &title, &to)?;
            tracing::info!("added task {title:?} under {to}");
        }
        Commands::Done { id } => {
            let author = config.resolve_username();
            backlog.mark_done(&id, author.as_deref(), chrono::Local::now().naive_local())?;
            tracing::info!("marked {id} done");
        }
        Commands::Rebuild => {
            tracing::info!("rebuilding {}", path.display());
        }
    }

    assign_ids(&mut ctx, &mut backlog)?;

    let rendered = emit::to_yaml_string(&dump_backlog(&backlog));
    backup::rotate_backups(&path, config.backup_count)?;
    fs::write(&path, rendered)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read and parse the document. A missing file is a fresh, empty backlog;
/// an unparseable one is a fatal error.
fn read_document(path: &Path) -> Result<serde_yaml::Value> {
    if !path.exists() {
        tracing::info!("{} does not exist yet, starting empty", path.display());
        return Ok(serde_yaml::Value::Null);
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
