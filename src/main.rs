use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, bail};
use std::path::PathBuf;
use tasklist::{BackendKind, Change, Config, KeyValueStore, LoadOutcome, Task, TaskId, TaskStore, Visibility};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Task list - add, edit, complete, search and delete short tasks")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/tasklist/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the task data (overrides the config file)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Storage backend: sqlite, file or memory (overrides the config file)
    #[arg(short, long)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add { text: String },

    /// Change the title of a task
    Edit { id: TaskId, text: String },

    /// Mark a task done, or not done again
    Done { id: TaskId },

    /// Delete a task
    Rm { id: TaskId },

    /// List tasks, most recent first
    Ls {
        /// Only show tasks whose title contains this text (case-insensitive)
        #[arg(short, long, default_value = "")]
        query: String,

        /// Which tasks to show: all, active or done
        #[arg(long, default_value = "all")]
        show: Visibility,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        !matches!(self, Commands::Ls { .. })
    }
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.store_path {
        config.data_dir = Some(dir);
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    if let Some(warning) = backend_warning(config.backend) {
        eprintln!("{}", warning.yellow());
    }

    let mut store = TaskStore::new(config.open_backend()?)
        .with_key(config.key.clone())
        .with_status_ttl(config.status_ttl());
    let loaded = store.load();

    run(&mut store, loaded, cli.command)
}

fn backend_warning(backend: BackendKind) -> Option<&'static str> {
    match backend {
        BackendKind::Memory => Some("Memory backend: changes are discarded when tasklist exits"),
        BackendKind::Sqlite | BackendKind::File => None,
    }
}

/// Apply one command to a loaded store and print the result
fn run<K: KeyValueStore>(store: &mut TaskStore<K>, loaded: LoadOutcome, command: Commands) -> Result<()> {
    if loaded == LoadOutcome::Failed {
        if command.mutates() {
            bail!("Stored tasks could not be read; refusing to overwrite them");
        }
        eprintln!("{}", "Stored tasks could not be read; showing an empty list".yellow());
    }

    match command {
        Commands::Add { text } => {
            let change = store.submit(&text)?;
            if change == Change::Unchanged {
                println!("{}", "Nothing added: the title is empty".yellow());
            }
        }
        Commands::Edit { id, text } => {
            let Some(task) = store.get(id) else {
                bail!("No task with id {}", id);
            };
            let title = task.title.clone();
            store.begin_edit(id, &title);
            if store.submit(&text)? == Change::Unchanged {
                println!("{}", "Nothing changed: the title is empty".yellow());
            }
        }
        Commands::Done { id } => {
            if store.toggle_done(id)? == Change::Unchanged {
                bail!("No task with id {}", id);
            }
            if let Some(task) = store.get(id) {
                println!("{}", render_task(task));
            }
        }
        Commands::Rm { id } => {
            if store.remove(id)? == Change::Unchanged {
                bail!("No task with id {}", id);
            }
        }
        Commands::Ls { query, show } => {
            store.set_query(query);
            store.set_visibility(show);
            render_list(store);
        }
    }

    if let Some(status) = store.status() {
        println!("{}", status.to_string().green());
    }

    Ok(())
}

fn render_list<K: KeyValueStore>(store: &TaskStore<K>) {
    let visible = store.visible();
    if visible.is_empty() {
        println!("{}", "No tasks".dimmed());
        return;
    }
    for task in visible {
        println!("{}", render_task(task));
    }
}

fn render_task(task: &Task) -> String {
    let mark = if task.is_done { "[x]".green() } else { "[ ]".normal() };
    let title = if task.is_done {
        task.title.as_str().dimmed().strikethrough()
    } else {
        task.title.as_str().normal()
    };
    format!("{} {}  {}", mark, format!("{:>4}", task.id).cyan(), title)
}
