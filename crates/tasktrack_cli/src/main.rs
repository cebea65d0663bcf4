//! `tasktrack` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and map them onto `TaskService` operations.
//! - Render results; business rules stay in `tasktrack_core`.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tasktrack_core::{
    default_log_level, init_logging, EditTaskRequest, JsonFileStore, ServiceError, StoreConfig,
    Task, TaskId, TaskService,
};

#[derive(Parser, Debug)]
#[command(name = "tasktrack")]
#[command(version)]
#[command(about = "Track short text tasks with a status")]
struct Cli {
    /// Directory holding db.json and counter.json
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,
    /// Log directory (defaults to <data-dir>/.tasktrack/logs)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Add a new task
    Add {
        #[arg(long)]
        title: String,
        /// todo|doing|done (defaults to todo)
        #[arg(long)]
        status: Option<String>,
    },
    /// Edit the title and/or status of a task
    Edit {
        #[arg(long)]
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        id: TaskId,
    },
    /// List all tasks
    List {
        /// Print the raw JSON collection
        #[arg(long)]
        json: bool,
    },
    /// List tasks with a given status
    Filter {
        #[arg(long, default_value = "todo")]
        status: String,
        /// Print the raw JSON collection
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let store = JsonFileStore::new(StoreConfig::in_dir(&cli.data_dir));
    setup_logging(&cli, store.config());

    let service = TaskService::new(store);
    match run(&service, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(cli: &Cli, config: &StoreConfig) {
    let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
    let log_dir = absolutize(&resolve_log_dir(cli.log_dir.as_deref(), config));
    // Logging is diagnostic only; a broken log sink must not block the command.
    if let Err(err) = init_logging(level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

/// Explicit `--log-dir`, else `.tasktrack/logs` next to the tasks document.
fn resolve_log_dir(log_dir: Option<&Path>, config: &StoreConfig) -> PathBuf {
    if let Some(dir) = log_dir {
        return dir.to_path_buf();
    }
    config
        .tasks_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(".tasktrack")
        .join("logs")
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn run(service: &TaskService<JsonFileStore>, command: Command) -> Result<(), ServiceError> {
    match command {
        Command::Add { title, status } => {
            let task = service.add(title, status.as_deref())?;
            println!("added {}", render_task(&task));
        }
        Command::Edit { id, title, status } => {
            let task = service.edit(id, &EditTaskRequest { title, status })?;
            println!("updated {}", render_task(&task));
        }
        Command::Delete { id } => {
            let remaining = service.delete(id)?;
            println!("deleted task {id}");
            print_tasks(&remaining, false);
        }
        Command::List { json } => print_tasks(&service.list()?, json),
        Command::Filter { status, json } => print_tasks(&service.filter(&status)?, json),
    }
    Ok(())
}

fn print_tasks(tasks: &[Task], json: bool) {
    if json {
        match serde_json::to_string_pretty(tasks) {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("error: failed to encode tasks: {err}"),
        }
        return;
    }
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for task in tasks {
        println!("{}", render_task(task));
    }
}

fn render_task(task: &Task) -> String {
    format!("#{:<4} [{:<5}] {}", task.id, task.status, task.title)
}
