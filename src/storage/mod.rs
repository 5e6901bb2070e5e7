pub mod codec;
pub mod json_backend;

use std::path::{Path, PathBuf};

use crate::{errors::LedgerError, ledger::Categories};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over stores that keep named snapshots of the category map.
pub trait SnapshotBackend {
    fn save(&self, categories: &Categories, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<Categories>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, categories: &Categories, name: &str, note: Option<&str>) -> Result<PathBuf>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Categories>;

    /// Ad-hoc export outside the managed directories.
    fn save_to_path(&self, categories: &Categories, path: &Path) -> Result<()> {
        json_backend::save_snapshot_to_path(categories, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Categories> {
        json_backend::load_snapshot_from_path(path)
    }
}

pub use json_backend::{export_file_name, JsonStorage, DEFAULT_RETENTION};
