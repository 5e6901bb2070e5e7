use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::Config,
    errors::LedgerError,
    ingest::{self, IngestReport},
    ledger::{Categories, CategoryBucket, SelectionSet, Transaction},
    storage::{codec, SnapshotBackend},
};

use super::services::{
    CategoryService, CategorySummary, ServiceError, ServiceResult, SortKey, SortService,
    SortSpec, Statistics, StatusSource, SummaryService, TransferOutcome, TransferService,
};

/// What a successful `transfer_selected` did to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub source: String,
    pub target: String,
    pub moved: usize,
    pub source_removed: bool,
    pub target_created: bool,
}

/// Single owner of the analyzer state: the category map, the open bucket, its
/// selection and ordering.
///
/// Every mutation computes the next map first and swaps it in only on success,
/// so a rejected call leaves the session exactly as it was.
pub struct AnalyzerSession {
    categories: Categories,
    active: Option<String>,
    selection: SelectionSet,
    sort: SortSpec,
    config: Config,
    storage: Option<Box<dyn SnapshotBackend>>,
    current_name: Option<String>,
}

impl AnalyzerSession {
    pub fn new(config: Config) -> Self {
        Self {
            categories: Categories::new(),
            active: None,
            selection: SelectionSet::new(),
            sort: SortSpec::default(),
            config,
            storage: None,
            current_name: None,
        }
    }

    pub fn with_storage(config: Config, storage: Box<dyn SnapshotBackend>) -> Self {
        let mut session = Self::new(config);
        session.storage = Some(storage);
        session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_bucket(&self) -> Option<&CategoryBucket> {
        self.active.as_deref().and_then(|name| self.categories.get(name))
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    /// Normalizes and groups a statement, replacing all state and opening the first bucket.
    pub fn ingest(&mut self, provider_tag: &str, rows: Vec<Value>) -> ServiceResult<IngestReport> {
        let report = ingest::ingest(provider_tag, rows, &self.config.normalize_options())?;
        let mut categories = CategoryService::group(report.transactions.iter().cloned());
        let seeded = CategoryService::seed(
            &mut categories,
            self.config.budget_categories.iter().map(String::as_str),
        );
        debug!(seeded, "added empty budget categories");
        info!(
            provider = report.provider.key(),
            transactions = report.transactions.len(),
            categories = categories.len(),
            "statement ingested"
        );
        self.categories = categories;
        self.active = self
            .categories
            .iter()
            .find(|(_, bucket)| !bucket.is_empty())
            .or_else(|| self.categories.iter().next())
            .map(|(name, _)| name.to_string());
        self.selection = SelectionSet::new();
        self.selection.retarget(self.active.as_deref());
        self.sort = SortSpec::default();
        self.current_name = None;
        Ok(report)
    }

    pub fn open_category(&mut self, name: &str) -> ServiceResult<()> {
        if !self.categories.contains(name) {
            return Err(ServiceError::UnknownSourceCategory(name.to_string()));
        }
        self.active = Some(name.to_string());
        self.selection.retarget(Some(name));
        debug!(category = name, "opened category");
        Ok(())
    }

    pub fn close_category(&mut self) {
        self.active = None;
        self.selection.retarget(None);
    }

    /// How statuses in the open bucket are displayed and sorted.
    pub fn status_source(&self) -> StatusSource {
        self.active
            .as_deref()
            .map(|name| self.config.status_source(name))
            .unwrap_or_default()
    }

    /// Rows of the open bucket in display order.
    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        match self.active_bucket() {
            Some(bucket) => SortService::sort(bucket.transactions(), &self.sort, self.status_source()),
            None => Vec::new(),
        }
    }

    /// Toggles the transaction shown at `display_index`; `None` when no such row is visible.
    pub fn toggle_row(&mut self, display_index: usize) -> Option<bool> {
        let id = self.visible_transactions().get(display_index)?.id;
        Some(self.selection.toggle(id))
    }

    /// Toggles a transaction of the open bucket by id; ids outside it are ignored.
    pub fn toggle_transaction(&mut self, id: Uuid) -> Option<bool> {
        if !self.active_bucket()?.contains(id) {
            return None;
        }
        Some(self.selection.toggle(id))
    }

    /// Selects every row of the open bucket, or clears them all; returns the selection size.
    pub fn toggle_all(&mut self) -> usize {
        if let Some(name) = self.active.as_deref() {
            if let Some(bucket) = self.categories.get(name) {
                self.selection.toggle_all(bucket);
            }
        }
        self.selection.len()
    }

    pub fn sort_by(&mut self, key: SortKey) -> SortSpec {
        self.sort.toggle(key);
        self.sort
    }

    pub fn transfer_selected(&mut self, target: &str) -> ServiceResult<TransferReport> {
        let source = self
            .active
            .clone()
            .ok_or_else(|| ServiceError::UnknownSourceCategory(String::new()))?;
        let TransferOutcome {
            categories,
            moved,
            source_removed,
            target_created,
        } = TransferService::transfer(&self.categories, &source, target, &self.selection)?;

        self.categories = categories;
        self.selection.clear();
        if source_removed {
            self.close_category();
        }
        Ok(TransferReport {
            source,
            target: target.trim().to_string(),
            moved,
            source_removed,
            target_created,
        })
    }

    /// Buckets the open category's rows may be moved to: everything except the open
    /// bucket and the configured unallocated sources.
    pub fn transfer_targets(&self) -> Vec<&str> {
        let active = self.active.as_deref();
        self.categories
            .names()
            .filter(|name| Some(*name) != active && !self.config.is_unallocated_category(name))
            .collect()
    }

    pub fn add_category(&mut self, name: &str) -> ServiceResult<String> {
        let mut next = self.categories.clone();
        let name = CategoryService::add(&mut next, name)?;
        self.categories = next;
        Ok(name)
    }

    /// Drops all state, keeping configuration and storage.
    pub fn reset(&mut self) {
        self.categories = Categories::new();
        self.active = None;
        self.selection = SelectionSet::new();
        self.sort = SortSpec::default();
        self.current_name = None;
        debug!("session reset");
    }

    pub fn export_snapshot(&self) -> Result<Value, LedgerError> {
        codec::serialize(&self.categories)
    }

    /// Replaces state with a decoded snapshot; a rejected snapshot changes nothing.
    pub fn import_snapshot(&mut self, value: Value) -> ServiceResult<usize> {
        let categories = codec::deserialize(value)?;
        Ok(self.replace_categories(categories))
    }

    pub fn statistics(&self) -> Statistics {
        SummaryService::statistics(&self.categories, &self.config.transfer_categories)
    }

    pub fn overview(&self) -> Vec<CategorySummary> {
        SummaryService::overview(&self.categories)
    }

    pub fn warnings(&self) -> Vec<String> {
        SummaryService::warnings(&self.categories)
    }

    pub fn export_to_path(&self, path: &Path) -> Result<(), LedgerError> {
        self.storage()?.save_to_path(&self.categories, path)?;
        info!(path = %path.display(), "exported snapshot");
        Ok(())
    }

    pub fn import_from_path(&mut self, path: &Path) -> ServiceResult<usize> {
        let categories = self.storage()?.load_from_path(path)?;
        info!(path = %path.display(), "imported snapshot");
        Ok(self.replace_categories(categories))
    }

    pub fn save(&mut self, name: &str) -> Result<PathBuf, LedgerError> {
        let path = self.storage()?.save(&self.categories, name)?;
        self.current_name = Some(name.to_string());
        Ok(path)
    }

    pub fn load(&mut self, name: &str) -> ServiceResult<usize> {
        let categories = self.storage()?.load(name)?;
        let count = self.replace_categories(categories);
        self.current_name = Some(name.to_string());
        Ok(count)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<PathBuf, LedgerError> {
        let name = self.named_snapshot()?;
        self.storage()?.backup(&self.categories, name, note)
    }

    pub fn list_backups(&self) -> Result<Vec<String>, LedgerError> {
        let name = self.named_snapshot()?;
        self.storage()?.list_backups(name)
    }

    pub fn restore(&mut self, backup_name: &str) -> ServiceResult<usize> {
        let name = self.named_snapshot()?.to_string();
        let categories = self.storage()?.restore(&name, backup_name)?;
        let count = self.replace_categories(categories);
        self.current_name = Some(name);
        Ok(count)
    }

    fn storage(&self) -> Result<&dyn SnapshotBackend, LedgerError> {
        self.storage
            .as_deref()
            .ok_or_else(|| LedgerError::StorageError("no snapshot storage configured".into()))
    }

    fn named_snapshot(&self) -> Result<&str, LedgerError> {
        self.current_name
            .as_deref()
            .ok_or_else(|| LedgerError::StorageError("state has not been saved under a name".into()))
    }

    fn replace_categories(&mut self, categories: Categories) -> usize {
        let count = categories.transaction_count();
        self.categories = categories;
        self.active = None;
        self.selection = SelectionSet::new();
        self.sort = SortSpec::default();
        count
    }
}
