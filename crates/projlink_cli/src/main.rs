//! `projlink` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the configured storage.
//! - Load the store under the chosen corrupt-data policy.
//! - Report every failure as a short notice on stderr; never panic.

mod cli;
mod commands;
mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::AppConfig;
use log::{info, warn};
use projlink_core::{
    init_logging, BlobStorage, LoadReport, ProjectStore, StoreError, UuidIdGenerator,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", notice(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let config = AppConfig::resolve(&cli.global)?;
    start_logging(&config);

    let storage = config.open_storage()?;
    let mut store = load_store(storage, config.reset_corrupt)?;
    commands::execute(&mut store, cli.command, &mut |url: &str| open::that_detached(url))
}

// Logging is best-effort: a broken log dir must not block the user.
fn start_logging(config: &AppConfig) {
    let Some(log_dir) = config.log_dir.to_str() else {
        eprintln!("warning: logging disabled: log dir is not valid UTF-8");
        return;
    };
    if let Err(err) = init_logging(&config.log_level, log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn load_store(
    storage: Box<dyn BlobStorage>,
    reset_corrupt: bool,
) -> Result<ProjectStore<Box<dyn BlobStorage>>> {
    if !reset_corrupt {
        return ProjectStore::load(storage, UuidIdGenerator)
            .context("cannot load saved projects (rerun with --reset-corrupt to start empty)");
    }

    let (store, report) = ProjectStore::load_or_reset(storage, UuidIdGenerator)?;
    match &report {
        LoadReport::ResetAfterCorruption { reason } => {
            warn!("event=cli_load module=cli status=reset");
            eprintln!(
                "warning: saved projects were unreadable ({reason}); starting with an empty list. \
                 The old data is overwritten on the next change."
            );
        }
        LoadReport::Empty | LoadReport::Loaded { .. } => {
            info!("event=cli_load module=cli status=ok");
        }
    }
    Ok(store)
}

/// Maps errors to the transient notices the user sees.
fn notice(err: &anyhow::Error) -> String {
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::Validation(validation)) => {
            format!("Error: Title and URL are required fields ({validation}).")
        }
        Some(StoreError::NotFound(id)) => format!("Error: no project with id {id}."),
        _ => format!("Error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projlink_core::{MemoryBlobStorage, ProjectFields, ProjectId};

    #[test]
    fn validation_notice_names_required_fields() {
        let err = anyhow::Error::new(StoreError::Validation(
            ProjectFields::new("", "https://x.dev")
                .into_validated()
                .unwrap_err(),
        ));
        assert_eq!(
            notice(&err),
            "Error: Title and URL are required fields (missing required field(s): title)."
        );
    }

    #[test]
    fn not_found_notice_names_id() {
        let err = anyhow::Error::new(StoreError::NotFound(ProjectId::new("abc")));
        assert_eq!(notice(&err), "Error: no project with id abc.");
    }

    #[test]
    fn strict_load_surfaces_corrupt_data() {
        let storage: Box<dyn BlobStorage> = Box::new(MemoryBlobStorage::with_blob("oops"));
        let err = load_store(storage, false).err().expect("corrupt blob must fail");
        assert!(format!("{err:#}").contains("--reset-corrupt"));
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::CorruptBlob(_))
        ));
    }

    #[test]
    fn reset_policy_starts_empty() {
        let storage: Box<dyn BlobStorage> = Box::new(MemoryBlobStorage::with_blob("oops"));
        let store = load_store(storage, true).unwrap();
        assert!(store.is_empty());
    }
}
