//! Runtime configuration resolved from flags, env and platform defaults.

use crate::cli::{BackendArg, GlobalArgs};
use anyhow::{Context, Result};
use projlink_core::{default_log_level, BlobStorage, FileBlobStorage, SqliteBlobStorage};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "projlink";
const FALLBACK_DATA_DIR: &str = ".projlink";
const SQLITE_FILE_NAME: &str = "projlink.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: BackendArg,
    pub storage_key: String,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub reset_corrupt: bool,
}

impl AppConfig {
    /// Resolves every setting to a concrete, absolute value.
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        let data_dir = args
            .data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR));
        let data_dir = absolutize(&cwd, data_dir);
        let log_dir = args
            .log_dir
            .clone()
            .map(|dir| absolutize(&cwd, dir))
            .unwrap_or_else(|| data_dir.join("logs"));

        let storage_key = args.storage_key.trim().to_string();
        anyhow::ensure!(!storage_key.is_empty(), "storage key cannot be empty");

        Ok(Self {
            data_dir,
            backend: args.backend,
            storage_key,
            log_level: args
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
            reset_corrupt: args.reset_corrupt,
        })
    }

    /// Location of the persisted collection for the chosen backend.
    pub fn storage_path(&self) -> PathBuf {
        match self.backend {
            BackendArg::Sqlite => self.data_dir.join(SQLITE_FILE_NAME),
            BackendArg::File => self.data_dir.join(format!("{}.json", self.storage_key)),
        }
    }

    /// Opens the configured backend, creating the data dir if needed.
    pub fn open_storage(&self) -> Result<Box<dyn BlobStorage>> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("cannot create data directory `{}`", self.data_dir.display())
        })?;
        let path = self.storage_path();
        let storage: Box<dyn BlobStorage> = match self.backend {
            BackendArg::Sqlite => {
                let conn = projlink_core::db::open_db(&path)
                    .with_context(|| format!("cannot open `{}`", path.display()))?;
                Box::new(SqliteBlobStorage::try_new(conn, self.storage_key.clone())?)
            }
            BackendArg::File => Box::new(FileBlobStorage::new(path)),
        };
        Ok(storage)
    }
}

fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
