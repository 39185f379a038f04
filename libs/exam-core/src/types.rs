//! Core types for exam question banks.

use crate::error::{BlockDefect, InvalidLetter, ParseError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Option letter, `A` through `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Letter(char);

impl Letter {
    /// Create a letter, rejecting anything outside `A`-`Z`.
    pub fn new(c: char) -> Option<Self> {
        c.is_ascii_uppercase().then_some(Self(c))
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for Letter {
    type Error = InvalidLetter;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::new(c).ok_or_else(|| InvalidLetter(c.to_string()))
    }
}

impl TryFrom<String> for Letter {
    type Error = InvalidLetter;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c).map_err(|_| InvalidLetter(s)),
            _ => Err(InvalidLetter(s)),
        }
    }
}

impl From<Letter> for String {
    fn from(letter: Letter) -> Self {
        letter.0.to_string()
    }
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub statement: String,
    pub options: BTreeMap<Letter, String>,
    pub answers: BTreeSet<Letter>,
    pub timestamp: NaiveDateTime,
}

impl QuestionRecord {
    /// Whether more than one option must be selected.
    pub fn is_multi_answer(&self) -> bool {
        self.answers.len() > 1
    }

    /// Text of the option with the given letter.
    pub fn option(&self, letter: Letter) -> Option<&str> {
        self.options.get(&letter).map(String::as_str)
    }
}

/// Questions ordered by timestamp, oldest first.
///
/// Read-only once built. Ties keep the order in which records were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionCollection(Vec<QuestionRecord>);

impl QuestionCollection {
    /// Build a collection, sorting records by timestamp.
    pub fn from_records(mut records: Vec<QuestionRecord>) -> Self {
        // sort_by_key is stable
        records.sort_by_key(|record| record.timestamp);
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionRecord> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[QuestionRecord] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for QuestionCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<QuestionRecord>::deserialize(deserializer).map(Self::from_records)
    }
}

impl<'a> IntoIterator for &'a QuestionCollection {
    type Item = &'a QuestionRecord;
    type IntoIter = std::slice::Iter<'a, QuestionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A block excluded from the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Position among the non-empty blocks of the document, starting at 0.
    pub block_index: usize,
    /// First non-blank line of the block.
    pub snippet: String,
    pub reason: BlockDefect,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {} ({:?}): {}", self.block_index, self.snippet, self.reason)
    }
}

/// Outcome of parsing one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseReport {
    /// Number of non-empty blocks in the document.
    pub blocks_found: usize,
    pub collection: QuestionCollection,
    pub anomalies: Vec<Anomaly>,
}

impl ParseReport {
    pub fn valid_count(&self) -> usize {
        self.collection.len()
    }

    /// Take the collection, failing when no block produced a question.
    pub fn into_collection(self) -> Result<QuestionCollection, ParseError> {
        if self.collection.is_empty() {
            return Err(ParseError::NoUsableQuestions {
                blocks_found: self.blocks_found,
                anomalies: self.anomalies,
            });
        }
        Ok(self.collection)
    }
}
