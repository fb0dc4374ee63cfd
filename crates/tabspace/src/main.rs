//! Tabspace - a headless console host for the tab workspace.

mod cli;
mod console;
mod menu;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use cli::Cli;
use console::{Console, ConsoleModal};
use tabspace_core::logging::{init_logging, log_dir, LogConfig};
use tabspace_core::services::storage::default_data_dir;
use tabspace_core::{SqliteStore, Workspace, WorkspaceConfig, WorkspaceError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);

    let mut log_config = LogConfig::new(log_dir(&data_dir));
    if let Some(filter) = cli.log_filter() {
        log_config = log_config.with_filter(filter);
    }
    let _logging_guard = init_logging(log_config);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Tabspace");

    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli, data_dir)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Tabspace failed");
            let info = e.to_error_info();
            eprintln!("{}: {}", info.error_type, info.message);
            if let Some(hint) = info.hint {
                eprintln!("  hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, data_dir: PathBuf) -> Result<(), WorkspaceError> {
    let config = match &cli.config {
        Some(path) => WorkspaceConfig::load(path)?,
        None => WorkspaceConfig::default(),
    };
    let config = match cli.max_tabs {
        Some(max_tabs) => config.with_max_tabs(max_tabs),
        None => config,
    };

    let routes = menu::load_menu(cli.menu.as_deref())?;

    let store = SqliteStore::open(&data_dir)?;
    tracing::debug!(routes = routes.len(), "Menu loaded");

    let workspace = Workspace::builder(config)
        .route_table(Arc::new(routes))
        .modal(Arc::new(ConsoleModal::new()))
        .store(Arc::new(store))
        .build()?;

    Console::new(workspace).run().await;
    Ok(())
}
