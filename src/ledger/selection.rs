use std::collections::BTreeSet;

use uuid::Uuid;

use super::bucket::CategoryBucket;

/// Transactions marked for a pending transfer, bound to the bucket on screen.
///
/// Never persisted. Keyed by transaction id so re-sorting the view cannot change
/// which transactions are selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    category: Option<String>,
    selected: BTreeSet<Uuid>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            selected: BTreeSet::new(),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Binds the set to another bucket, dropping marks made elsewhere.
    pub fn retarget(&mut self, name: Option<&str>) {
        if self.category.as_deref() != name {
            self.category = name.map(str::to_string);
            self.selected.clear();
        }
    }

    /// Flips one mark and returns whether it is now selected.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn select(&mut self, id: Uuid) {
        self.selected.insert(id);
    }

    /// Selects every transaction of `bucket`, or clears them all if they already were.
    pub fn toggle_all(&mut self, bucket: &CategoryBucket) {
        let all_selected = !bucket.is_empty()
            && bucket
                .transactions()
                .iter()
                .all(|txn| self.selected.contains(&txn.id));
        self.selected.clear();
        if !all_selected {
            self.selected
                .extend(bucket.transactions().iter().map(|txn| txn.id));
        }
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    pub fn ids(&self) -> &BTreeSet<Uuid> {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

impl FromIterator<Uuid> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self {
            category: None,
            selected: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{StatementDate, Transaction};

    fn bucket(count: usize) -> CategoryBucket {
        CategoryBucket::from_transactions(
            (0..count)
                .map(|i| Transaction::new(StatementDate::Unknown, -(i as f64), "Test"))
                .collect(),
        )
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = SelectionSet::new();
        let id = Uuid::new_v4();
        assert!(selection.toggle(id));
        assert!(selection.is_selected(id));
        assert!(!selection.toggle(id));
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let bucket = bucket(3);
        let mut selection = SelectionSet::for_category("Test");
        selection.select(bucket.transactions()[0].id);
        selection.toggle_all(&bucket);
        assert_eq!(selection.len(), 3);
        selection.toggle_all(&bucket);
        assert!(selection.is_empty());
    }

    #[test]
    fn retarget_discards_marks_from_other_views() {
        let mut selection = SelectionSet::for_category("Food");
        selection.select(Uuid::new_v4());
        selection.retarget(Some("Food"));
        assert_eq!(selection.len(), 1);
        selection.retarget(Some("Travel"));
        assert!(selection.is_empty());
        assert_eq!(selection.category(), Some("Travel"));
    }
}
