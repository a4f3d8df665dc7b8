use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use composite::format::format_totals;
use composite::{AppConfig, ProjectDb, ProjectEdit, ProjectStore, StoreHealth};

#[derive(Parser)]
#[command(name = "composite")]
#[command(about = "Track project costs and time estimates")]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the database file from the config
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every project followed by the totals
    List,
    /// Add a new project
    Add {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Cost in Rupiah
        #[arg(long, default_value = "")]
        cost: String,
        /// Time in hours
        #[arg(long, default_value = "")]
        time: String,
    },
    /// Edit a project; omitted fields keep their current value
    Edit {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        cost: Option<String>,
        #[arg(long)]
        time: Option<String>,
    },
    /// Toggle the favorite flag of a project
    Favorite { id: Uuid },
    /// Delete a project by id
    Delete { id: Uuid },
    /// Delete the project at a position in `list`
    DeleteAt { index: usize },
    /// Show the totals only
    Totals,
}

fn has_name_or_description(name: &str, description: &str) -> bool {
    !name.is_empty() || !description.is_empty()
}

fn print_list(store: &ProjectStore<ProjectDb>) {
    if store.list().is_empty() {
        println!("No projects.");
    }
    for (index, project) in store.list().iter().enumerate() {
        let marker = if project.favorite { '*' } else { ' ' };
        println!(
            "{:>3} {} {}  {}  {}",
            index,
            marker,
            if project.name.is_empty() { "NO NAME" } else { project.name.as_str() },
            project.description,
            project.cost
        );
        println!("      id: {}", project.id);
    }
    println!();
    println!("{}", format_totals(&store.totals()));
}

async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let mut store = ProjectStore::open(&config.database_path).await;
    if let StoreHealth::Degraded(reason) = store.health() {
        eprintln!("Warning: {}", reason);
    }

    match cli.command {
        Command::List => print_list(&store),
        Command::Totals => println!("{}", format_totals(&store.totals())),
        Command::Add {
            name,
            description,
            cost,
            time,
        } => {
            if !has_name_or_description(&name, &description) {
                anyhow::bail!("A project needs a name or a description");
            }
            let id = store.add(name, description, cost, time).await?;
            println!("Added {}", id);
            println!("{}", format_totals(&store.totals()));
        }
        Command::Edit {
            id,
            name,
            description,
            cost,
            time,
        } => {
            let current = store
                .get(id)
                .cloned()
                .ok_or(composite::StoreError::NotFound(id))?;
            let edit = ProjectEdit {
                name: name.unwrap_or(current.name),
                description: description.unwrap_or(current.description),
                cost: cost.unwrap_or(current.cost),
                time: time.unwrap_or(current.time),
            };
            if !has_name_or_description(&edit.name, &edit.description) {
                anyhow::bail!("A project needs a name or a description");
            }
            store.edit(id, edit).await?;
            println!("Saved {}", id);
        }
        Command::Favorite { id } => {
            let favorite = store.toggle_favorite(id).await?;
            println!("{} favorite: {}", id, favorite);
        }
        Command::Delete { id } => {
            store.delete(id).await?;
            println!("Deleted {}", id);
            println!("{}", format_totals(&store.totals()));
        }
        Command::DeleteAt { index } => {
            let id = store.delete_at(index).await?;
            println!("Deleted {}", id);
            println!("{}", format_totals(&store.totals()));
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::try_load(cli.config.as_deref());
    let mut config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => AppConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }

    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = &loaded {
        tracing::warn!("{:#}, using defaults", e);
    }

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))
}
