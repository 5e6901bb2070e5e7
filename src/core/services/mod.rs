pub mod category_service;
pub mod sort_service;
pub mod summary_service;
pub mod transfer_service;

pub use category_service::CategoryService;
pub use sort_service::{SortDirection, SortKey, SortService, SortSpec, StatusSource};
pub use summary_service::{CategorySummary, Statistics, SummaryService};
pub use transfer_service::{TransferOutcome, TransferService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rejected state changes. The state handed to the failing call is left as it was.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("No transactions selected in `{category}`")]
    EmptySelection { category: String },
    #[error("Category `{0}` does not exist")]
    UnknownSourceCategory(String),
    #[error("Cannot transfer `{0}` into itself")]
    SelfTransfer(String),
    #[error("Category `{0}` already exists")]
    DuplicateCategoryName(String),
    #[error("Category name cannot be empty")]
    EmptyCategoryName,
}
