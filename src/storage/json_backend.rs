use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::LedgerError,
    ledger::Categories,
};

use super::{codec, Result, SnapshotBackend};

const SNAPSHOT_EXTENSION: &str = "json";
pub(crate) const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const EXPORT_DATE_FORMAT: &str = "%d.%m.%y";
const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_RETENTION: usize = 5;

/// Snapshot store rooted at a data directory.
///
/// Named snapshots live in `<root>/snapshots/<name>.json`; their backups in
/// `<root>/backups/<name>/`.
#[derive(Clone)]
pub struct JsonStorage {
    snapshots_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let snapshots_dir = PathResolver::snapshot_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&snapshots_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            snapshots_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.snapshots_dir
            .join(format!("{}.{}", canonical_name(name), SNAPSHOT_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn backup_file_name(&self, name: &str, note: Option<&str>) -> String {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        unique_file_name(&self.backup_dir(name), &file_stem)
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let backup_path = dir.join(self.backup_file_name(name, None));
        fs::copy(path, &backup_path)?;
        debug!(backup = %backup_path.display(), "kept previous snapshot");
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, entry);
            let _ = fs::remove_file(path);
        }
        Ok(())
    }
}

impl SnapshotBackend for JsonStorage {
    /// Replaces the named snapshot, keeping the previous file as a backup.
    fn save(&self, categories: &Categories, name: &str) -> Result<PathBuf> {
        let path = self.snapshot_path(name);
        self.backup_existing_file(name, &path)?;
        save_snapshot_to_path(categories, &path)?;
        info!(snapshot = %path.display(), "saved snapshot");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<Categories> {
        let path = self.snapshot_path(name);
        if !path.exists() {
            return Err(LedgerError::StorageError(format!(
                "snapshot `{}` not found",
                name
            )));
        }
        load_snapshot_from_path(&path)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    fn backup(&self, categories: &Categories, name: &str, note: Option<&str>) -> Result<PathBuf> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let path = dir.join(self.backup_file_name(name, note));
        write_atomic(&path, &codec::to_json_string(categories)?)?;
        self.prune_backups(name)?;
        info!(backup = %path.display(), "created backup");
        Ok(path)
    }

    /// Validates the backup before it replaces the named snapshot.
    fn restore(&self, name: &str, backup_name: &str) -> Result<Categories> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(LedgerError::StorageError(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let categories = load_snapshot_from_path(&backup_path)?;
        let target = self.snapshot_path(name);
        save_snapshot_to_path(&categories, &target)?;
        info!(backup = backup_name, "restored snapshot");
        Ok(categories)
    }
}

pub fn save_snapshot_to_path(categories: &Categories, path: &Path) -> Result<()> {
    let json = codec::to_json_string(categories)?;
    write_atomic(path, &json)
}

pub fn load_snapshot_from_path(path: &Path) -> Result<Categories> {
    let data = fs::read_to_string(path)?;
    codec::from_json_str(&data)
}

/// Default export file name for a statement taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("Выписка от {}.json", date.format(EXPORT_DATE_FORMAT))
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "snapshot".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// First `<stem>[_N].json` in `dir` that is not taken yet.
pub(crate) fn unique_file_name(dir: &Path, stem: &str) -> String {
    let mut candidate = format!("{}.{}", stem, SNAPSHOT_EXTENSION);
    let mut counter = 2;
    while dir.join(&candidate).exists() {
        candidate = format!("{}_{}.{}", stem, counter, SNAPSHOT_EXTENSION);
        counter += 1;
    }
    candidate
}

/// Finds the `YYYYMMDD_HHMMSS` pair in a backup file name, with or without a note.
/// Names written before seconds were recorded carry `HHMM`.
pub(crate) fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(".json")?;
    let parts: Vec<&str> = stem.split('_').collect();
    parts.windows(2).rev().find_map(|pair| {
        if !is_digits(pair[0], 8) {
            return None;
        }
        let clock = match pair[1].len() {
            6 if is_digits(pair[1], 6) => pair[1].to_string(),
            4 if is_digits(pair[1], 4) => format!("{}00", pair[1]),
            _ => return None,
        };
        NaiveDateTime::parse_from_str(&format!("{}{}", pair[0], clock), "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Stages the data in a `.tmp` sibling, then renames it over `path`.
pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
