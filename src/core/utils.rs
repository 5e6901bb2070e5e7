use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

pub const HOME_ENV: &str = "FIN_NOTE_HOME";

const DEFAULT_DIR_NAME: &str = ".fin_note";
const SNAPSHOT_DIR: &str = "snapshots";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.fin_note`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Layout of the data directory, relative to an arbitrary root.
pub struct PathResolver;

impl PathResolver {
    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(app_data_dir)
    }

    pub fn snapshot_dir_in(root: &Path) -> PathBuf {
        root.join(SNAPSHOT_DIR)
    }

    pub fn backup_dir_in(root: &Path) -> PathBuf {
        root.join(BACKUP_DIR)
    }

    pub fn config_dir_in(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    pub fn config_file_in(root: &Path) -> PathBuf {
        Self::config_dir_in(root).join(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_hangs_off_the_root() {
        let root = PathBuf::from("/tmp/fin");
        assert_eq!(PathResolver::snapshot_dir_in(&root), root.join("snapshots"));
        assert_eq!(PathResolver::backup_dir_in(&root), root.join("backups"));
        assert_eq!(
            PathResolver::config_file_in(&root),
            root.join("config").join("config.json")
        );
        assert_eq!(PathResolver::resolve_base(Some(root.clone())), root);
    }
}
