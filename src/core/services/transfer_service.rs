use std::collections::BTreeSet;

use tracing::{debug, info};
use uuid::Uuid;

use crate::ledger::{Categories, CategoryBucket, SelectionSet};

use super::{CategoryService, ServiceError, ServiceResult};

/// Result of a successful transfer; `categories` replaces the caller's state wholesale.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub categories: Categories,
    pub moved: usize,
    pub source_removed: bool,
    pub target_created: bool,
}

pub struct TransferService;

impl TransferService {
    /// Moves the selected transactions of `source` to the end of `target`.
    ///
    /// The input map is never modified. A source left without transactions is
    /// dropped from the result; a missing target is created.
    pub fn transfer(
        categories: &Categories,
        source: &str,
        target: &str,
        selection: &SelectionSet,
    ) -> ServiceResult<TransferOutcome> {
        Self::transfer_ids(categories, source, target, selection.ids())
    }

    pub fn transfer_ids(
        categories: &Categories,
        source: &str,
        target: &str,
        ids: &BTreeSet<Uuid>,
    ) -> ServiceResult<TransferOutcome> {
        let source_bucket = categories
            .get(source)
            .ok_or_else(|| ServiceError::UnknownSourceCategory(source.to_string()))?;
        if source == target {
            return Err(ServiceError::SelfTransfer(source.to_string()));
        }
        let target = CategoryService::validate_name(target)?;
        if target == source {
            return Err(ServiceError::SelfTransfer(source.to_string()));
        }

        let (moved, remaining) = source_bucket.partition(ids);
        if moved.is_empty() {
            return Err(ServiceError::EmptySelection {
                category: source.to_string(),
            });
        }
        let moved_count = moved.len();

        let existing_target = categories.get(&target);
        let target_created = existing_target.is_none();
        let mut target_bucket = existing_target.cloned().unwrap_or_else(CategoryBucket::empty);
        target_bucket.extend(moved);

        let mut next = categories.clone();
        let source_removed = remaining.is_empty();
        if source_removed {
            next.remove(source);
        } else {
            next.insert(source, CategoryBucket::from_transactions(remaining));
        }
        next.insert(target.clone(), target_bucket);

        debug!(
            source,
            target = %target,
            moved = moved_count,
            source_removed,
            target_created,
            "transfer applied"
        );
        info!("moved {moved_count} transaction(s) from `{source}` to `{target}`");

        Ok(TransferOutcome {
            categories: next,
            moved: moved_count,
            source_removed,
            target_created,
        })
    }
}
