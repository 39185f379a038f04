//! Commands behind the `exam-maker` subcommands.

pub mod bank;
pub mod exam;

pub use bank::{
    import_directory, import_file, list_banks, parse_file, remove_bank, DirectoryImport,
    ImportResult, ImportStatus,
};
pub use exam::{save_report, start_exam, ExamSession};

use crate::store::StoreError;
use exam_core::{ParseError, QuizError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no question banks found, run `exam-maker import` first")]
    NoBanks,

    #[error("input closed before the exam finished")]
    InputClosed,
}
