use tracing::debug;

use crate::ledger::{Categories, CategoryBucket, Transaction};

use super::{ServiceError, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    /// Folds transactions into buckets keyed by their `category`, in input order.
    pub fn group(transactions: impl IntoIterator<Item = Transaction>) -> Categories {
        let mut categories = Categories::new();
        for transaction in transactions {
            categories
                .entry(transaction.category.clone())
                .or_insert_with(CategoryBucket::empty)
                .push(transaction);
        }
        debug!(buckets = categories.len(), "grouped transactions");
        categories
    }

    /// Inserts an empty bucket. Existing names are rejected, never overwritten.
    pub fn add(categories: &mut Categories, name: &str) -> ServiceResult<String> {
        let name = Self::validate_name(name)?;
        if categories.contains(&name) {
            return Err(ServiceError::DuplicateCategoryName(name));
        }
        categories.insert(name.clone(), CategoryBucket::empty());
        debug!(category = %name, "added empty category");
        Ok(name)
    }

    /// Adds an empty bucket for each configured name that is missing; returns how many were added.
    pub fn seed<'a>(categories: &mut Categories, names: impl IntoIterator<Item = &'a str>) -> usize {
        let mut added = 0;
        for name in names {
            match Self::add(categories, name) {
                Ok(_) => added += 1,
                Err(ServiceError::DuplicateCategoryName(_) | ServiceError::EmptyCategoryName) => {}
                Err(err) => debug!(%err, "skipped budget category"),
            }
        }
        added
    }

    pub fn validate_name(candidate: &str) -> ServiceResult<String> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            Err(ServiceError::EmptyCategoryName)
        } else {
            Ok(trimmed.to_string())
        }
    }
}
