pub mod services;
pub mod session;
pub mod utils;

pub use session::{AnalyzerSession, TransferReport};
