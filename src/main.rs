use std::path::PathBuf;
use std::sync::{Arc, MutexGuard};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use c2e::autosave::AutosaveScheduler;
use c2e::config::StudioConfig;
use c2e::models::{Platform, PreviewMode, Project};
use c2e::storage::{MemoryStore, SqliteStore, Store};
use c2e::{SharedStudio, Studio};

#[derive(Parser)]
#[command(name = "c2e")]
#[command(about = "Assemble interactive content projects and keep them saved locally")]
struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Keep everything in memory; nothing survives the process
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project
    New { name: Option<String> },
    /// List all projects
    List,
    /// List recently used projects
    Recent,
    /// Print a project as JSON
    Show { id: String },
    /// Delete a project
    Delete { id: String },
    /// Append an element to a project and save it
    AddElement { project_id: String, kind: String },
    /// Remove an element from a project and save it
    RemoveElement {
        project_id: String,
        element_id: String,
    },
    /// Print the effective configuration
    Config {
        /// Write it to the user config file
        #[arg(long)]
        init: bool,
    },
    /// Interactive editing session with autosave
    Edit {
        /// Project to open (defaults to the most recent one)
        id: Option<String>,

        /// Seconds between autosaves (overrides config)
        #[arg(long)]
        autosave_secs: Option<u64>,
    },
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "c2e=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_store(cli: &Cli, config: &StudioConfig) -> Result<Arc<dyn Store>> {
    if cli.memory {
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = match &cli.db {
        Some(path) => SqliteStore::open(path),
        None => SqliteStore::open_default(config.data_dir.as_deref()),
    }
    .context("Failed to open database")?;
    store.migrate().context("Failed to run migrations")?;
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = StudioConfig::load();
    if let Some(Commands::Config { init }) = cli.command {
        if init {
            let path = config.save()?;
            println!("Wrote {}", path.display());
        } else {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        return Ok(());
    }

    let store = open_store(&cli, &config)?;
    let mut studio = Studio::with_store(store, &config);

    match cli.command {
        Some(Commands::New { name }) => {
            let project = studio.create_project(name.as_deref())?;
            println!("{}", project.id);
        }
        Some(Commands::List) => print_projects(&studio.projects()?),
        Some(Commands::Recent) => print_projects(&studio.recent_projects()?),
        Some(Commands::Show { id }) => {
            let project = studio
                .projects()?
                .into_iter()
                .find(|p| p.id == id)
                .ok_or_else(|| c2e::Error::NotFound(id.clone()))?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        Some(Commands::Delete { id }) => {
            studio.delete_project(&id)?;
            println!("Deleted {}", id);
        }
        Some(Commands::AddElement { project_id, kind }) => {
            studio.load_project(&project_id)?;
            let element = studio.add_element(&kind)?;
            studio.save_current_project()?;
            println!("{}", element.id);
        }
        Some(Commands::RemoveElement {
            project_id,
            element_id,
        }) => {
            studio.load_project(&project_id)?;
            if !studio.remove_element(&element_id) {
                anyhow::bail!("Element not found: {}", element_id);
            }
            studio.save_current_project()?;
            println!("Removed {}", element_id);
        }
        Some(Commands::Edit { id, autosave_secs }) => {
            match id {
                Some(id) => {
                    studio.load_project(&id)?;
                }
                None => {
                    studio.restore_last_project()?;
                }
            }
            let period = autosave_secs
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| config.autosave_interval());
            run_editor(studio.into_shared(), period).await?;
        }
        // Handled before the store opens.
        Some(Commands::Config { .. }) => {}
        None => print_projects(&studio.recent_projects()?),
    }

    Ok(())
}

fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects");
        return;
    }
    for project in projects {
        println!(
            "{}  {:<50}  {} elements  modified {}",
            project.id,
            project.name,
            project.data.content.len(),
            project.last_modified.to_rfc3339()
        );
    }
}

async fn run_editor(studio: SharedStudio, period: std::time::Duration) -> Result<()> {
    let mut events = lock(&studio)?.subscribe();
    let watcher = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::debug!("event {}", event.name()),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::debug!("event watcher missed {} events", missed)
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let autosave = AutosaveScheduler::start(studio.clone(), period);
    print_status(&*lock(&studio)?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match handle_line(&studio, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("error: {:#}", e),
        }
    }

    autosave.stop().await;
    {
        let mut studio = lock(&studio)?;
        if studio.is_dirty() {
            studio
                .save_current_project()
                .context("Final save failed")?;
        }
    }
    watcher.abort();
    Ok(())
}

/// Returns `false` when the session should end.
fn handle_line(studio: &SharedStudio, line: &str) -> Result<bool> {
    let (command, arg) = match line.split_once(' ') {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    let mut studio = lock(studio)?;

    match command {
        "" => {}
        "quit" | "exit" => return Ok(false),
        "new" => {
            let project = studio.create_project(Some(arg))?;
            println!("created {}", project.id);
        }
        "open" => {
            let project = studio.load_project(arg)?;
            println!("opened {} ({})", project.id, project.name);
        }
        "add" => {
            let element = studio.add_element(arg)?;
            println!("added {} at {}", element.id, element.position);
        }
        "remove" => {
            if !studio.remove_element(arg) {
                println!("no element {}", arg);
            }
        }
        "select" => studio.select_element(arg),
        "save" => match studio.save_current_project()? {
            Some(project) => println!("saved {}", project.id),
            None => println!("no project is open"),
        },
        "close" => {
            studio.close_project();
        }
        "delete" => studio.delete_project(arg)?,
        "platform" => {
            let platform = Platform::from_str(arg)
                .ok_or_else(|| anyhow::anyhow!("unknown platform {}", arg))?;
            if !studio.set_preview_platform(platform) {
                println!("platform {} not enabled for this project", arg);
            }
        }
        "mode" => {
            let mode = PreviewMode::from_str(arg)
                .ok_or_else(|| anyhow::anyhow!("unknown preview mode {}", arg))?;
            studio.set_preview_mode(mode);
        }
        "elements" => {
            let selected = studio.selected_element().map(|e| e.id.clone());
            for element in studio.elements().get_all() {
                let marker = if selected.as_deref() == Some(element.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:>3} {} {} ({})",
                    marker, element.position, element.id, element.content.title, element.kind
                );
            }
        }
        "status" => print_status(&studio),
        other => println!("unknown command {}", other),
    }

    Ok(true)
}

fn print_status(studio: &Studio) {
    let preview = studio.preview();
    match studio.current_project() {
        Some(project) => println!(
            "{} ({}) [{}] {} elements, preview {}/{}, last saved {}",
            project.name,
            project.id,
            studio.state().as_str(),
            studio.elements().len(),
            preview.platform().as_str(),
            preview.mode().as_str(),
            studio
                .last_saved()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string())
        ),
        None => println!("[{}]", studio.state().as_str()),
    }
}

fn lock(studio: &SharedStudio) -> Result<MutexGuard<'_, Studio>> {
    studio
        .lock()
        .map_err(|_| anyhow::anyhow!("studio lock poisoned"))
}
