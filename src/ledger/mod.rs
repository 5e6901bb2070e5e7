//! Statement domain models: canonical transactions, category buckets and selections.

pub mod bucket;
pub mod categories;
pub mod date;
pub mod selection;
pub mod transaction;

pub use bucket::{amounts_match, CategoryBucket};
pub use categories::Categories;
pub use date::StatementDate;
pub use selection::SelectionSet;
pub use transaction::{Transaction, UNCATEGORIZED};
