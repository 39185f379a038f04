//! On-disk question bank storage.

pub mod error;
pub mod repository;

pub use error::StoreError;
pub use repository::{hash_content, BankRepository, BankSummary, JsonRepository, QuestionBank};
