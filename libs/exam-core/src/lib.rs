//! Core exam library shared by the command-line tools.
//!
//! Provides:
//! - Parser for markdown-flavored exam question documents
//! - Question types (QuestionRecord, QuestionCollection, Anomaly, ...)
//! - Sampling and scoring for exam sessions

pub mod error;
pub mod parser;
pub mod quiz;
pub mod types;

pub use error::{BlockDefect, InvalidLetter, ParseError, QuizError, Result};
pub use parser::parse;
pub use quiz::{evaluate, parse_response, sample, ExamReport, QuestionResult};
pub use types::{Anomaly, Letter, ParseReport, QuestionCollection, QuestionRecord};
