use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use super::bucket::CategoryBucket;

/// Map from category name to its bucket.
///
/// Key order is an implementation detail; callers must not rely on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories {
    buckets: BTreeMap<String, CategoryBucket>,
}

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CategoryBucket> {
        self.buckets.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryBucket)> {
        self.buckets.iter().map(|(name, bucket)| (name.as_str(), bucket))
    }

    pub fn first_name(&self) -> Option<&str> {
        self.names().next()
    }

    pub fn transaction_count(&self) -> usize {
        self.buckets.values().map(CategoryBucket::len).sum()
    }

    pub(crate) fn entry(&mut self, name: String) -> btree_map::Entry<'_, String, CategoryBucket> {
        self.buckets.entry(name)
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, bucket: CategoryBucket) {
        self.buckets.insert(name.into(), bucket);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<CategoryBucket> {
        self.buckets.remove(name)
    }
}

impl<'a> IntoIterator for &'a Categories {
    type Item = (&'a String, &'a CategoryBucket);
    type IntoIter = btree_map::Iter<'a, String, CategoryBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}
