use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    core::{
        services::StatusSource,
        utils::{ensure_dir, PathResolver},
    },
    errors::LedgerError,
    ingest::{CategoryMapping, NormalizeOptions},
    ledger::UNCATEGORIZED,
    storage::{
        json_backend::{
            parse_backup_timestamp, unique_file_name, write_atomic, BACKUP_TIMESTAMP_FORMAT,
        },
        DEFAULT_RETENTION,
    },
};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_DIR: &str = "backups";

/// Buckets whose rows are money moved between own accounts or people.
pub const DEFAULT_TRANSFER_CATEGORIES: &[&str] = &["P2P переводы", "Пополнения"];

/// Household budget buckets offered as transfer targets even before they hold anything.
pub const DEFAULT_BUDGET_CATEGORIES: &[&str] = &[
    "Телефон/Интернет",
    "Продукты",
    "Проезд",
    "Гайка",
    "Личные Антон",
    "Личные Алена",
    "Вкусняшки",
    "Здоровье",
    "Мама",
    "Квартплата",
    "Кредит",
    "Кэш",
];

/// Bank categories that only ever act as sources; they are not offered as transfer targets.
pub const DEFAULT_UNALLOCATED_CATEGORIES: &[&str] = &[
    "Маркетплейсы",
    "Медицина",
    "Одежда и обувь",
    "Цифровые товары",
    "Различные товары",
    "Экосистема Яндекс",
    "Детские товары",
    "Дом и ремонт",
];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub default_category: String,
    pub transfer_categories: Vec<String>,
    pub budget_categories: Vec<String>,
    pub unallocated_categories: Vec<String>,
    pub category_mapping: BTreeMap<String, String>,
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "ru-RU".into(),
            currency: "RUB".into(),
            default_category: UNCATEGORIZED.into(),
            transfer_categories: owned(DEFAULT_TRANSFER_CATEGORIES),
            budget_categories: owned(DEFAULT_BUDGET_CATEGORIES),
            unallocated_categories: owned(DEFAULT_UNALLOCATED_CATEGORIES),
            category_mapping: BTreeMap::new(),
            backup_retention: DEFAULT_RETENTION,
        }
    }
}

impl Config {
    pub fn normalize_options(&self) -> NormalizeOptions {
        let default_category = self.default_category.trim();
        NormalizeOptions {
            mapping: CategoryMapping::new(self.category_mapping.clone()),
            default_category: if default_category.is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                default_category.to_string()
            },
        }
    }

    pub fn is_unallocated_category(&self, name: &str) -> bool {
        self.unallocated_categories.iter().any(|entry| entry == name)
    }

    pub fn is_transfer_category(&self, name: &str) -> bool {
        self.transfer_categories.iter().any(|entry| entry == name)
    }

    pub fn status_source(&self, category: &str) -> StatusSource {
        if self.is_transfer_category(category) {
            StatusSource::DerivedFromSign
        } else {
            StatusSource::Recorded
        }
    }
}

/// Reads and writes `config.json` and its timestamped backups.
pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        let config_root = PathResolver::config_dir_in(&base);
        ensure_dir(&config_root)?;
        let backups_dir = config_root.join(BACKUP_DIR);
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir,
        })
    }

    /// Loads the stored configuration, or defaults when none was saved yet.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            debug!(path = %self.path.display(), "no configuration file; using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, LedgerError> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("config_{}", timestamp);
        if let Some(label) = sanitize_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let name = unique_file_name(&self.backups_dir, &stem);
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config, LedgerError> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(LedgerError::StorageError(format!(
                "configuration backup `{}` not found",
                backup_name
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    pub fn list_backups(&self) -> Result<Vec<String>, LedgerError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.')) && !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
