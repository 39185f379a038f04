//! Error types for exam-core.

use crate::types::{Anomaly, Letter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Structural defect that excludes a block from the collection.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockDefect {
    #[error("no option marker found")]
    NoOptions,

    #[error("option {letter} appears more than once")]
    DuplicateOption { letter: Letter },

    #[error("missing question statement")]
    MissingStatement,

    #[error("missing answer marker")]
    MissingAnswer,

    #[error("answer marker lists no letters")]
    EmptyAnswer,

    #[error("invalid answer: {value}")]
    InvalidAnswer { value: String },

    #[error("missing timestamp marker")]
    MissingTimestamp,

    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },

    #[error("answer {letter} is not one of the options")]
    UnknownAnswer { letter: Letter },
}

/// A value that is not a single letter from `A` to `Z`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid option letter: {0:?}")]
pub struct InvalidLetter(pub String);

/// Document-level parse errors.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no usable questions ({blocks_found} blocks found, {} rejected)", .anomalies.len())]
    NoUsableQuestions {
        blocks_found: usize,
        anomalies: Vec<Anomaly>,
    },
}

/// Errors raised by the quiz engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("collection has no questions")]
    EmptyCollection,

    #[error("at least one question must be requested")]
    ZeroSample,

    #[error("requested {requested} questions but only {available} are available")]
    SampleTooLarge { requested: usize, available: usize },
}
