//! CLI entry point.
//!
//! # Responsibility
//! - Without arguments: print a deterministic linkage probe.
//! - With a config path: open the configured store and summarize it.

use clap::Parser;
use log::error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use taskmaster_core::{
    init_logging, Backend, BackendKind, DataManager, FileDataManager, SqliteDataManager,
    StorageConfig, TodoList,
};

#[derive(Parser)]
#[command(name = "taskmaster")]
#[command(about = "Inspect a TaskMaster todo store")]
struct Cli {
    /// JSON storage config; omit to print the linkage probe
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Some(config_path) = cli.config else {
        println!("taskmaster_core ping={}", taskmaster_core::ping());
        println!("taskmaster_core version={}", taskmaster_core::core_version());
        return ExitCode::SUCCESS;
    };

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path) -> Result<(), String> {
    let config = StorageConfig::from_path(config_path).map_err(|err| err.to_string())?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.effective_log_level(), log_dir).map_err(|err| err.to_string())?;
    }

    match config.backend {
        BackendKind::FileCache => summarize(FileDataManager::<TodoList>::file_cache(), &config),
        BackendKind::Sqlite => summarize(SqliteDataManager::<TodoList>::sqlite(), &config),
    }
}

fn summarize<B: Backend<TodoList>>(
    mut manager: DataManager<TodoList, B>,
    config: &StorageConfig,
) -> Result<(), String> {
    manager
        .configure(&config.name, &config.connection_url)
        .map_err(|err| err.to_string())?;
    let lists = manager.load().map_err(|err| err.to_string())?;

    println!(
        "backend={} location={}",
        manager.backend_kind(),
        manager.location().unwrap_or_default()
    );
    println!("lists={}", lists.len());
    for list in &lists {
        println!(
            "  {} revision={} items={} open={} dirty={}",
            list.id,
            list.revision,
            list.items.len(),
            list.open_items().count(),
            list.is_dirty
        );
    }
    Ok(())
}
