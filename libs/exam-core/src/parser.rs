//! Parser for exam question documents.
//!
//! # Format
//! ```markdown
//! ## Examtopics question 12
//! Which service runs stateless containers?
//! **A:** Compute Engine
//! **B:** Cloud Run
//! **C:** Cloud SQL
//! **Answer: B**
//! **Timestamp: 2024-01-15 10:30:00**
//! ----------------------------------------
//! ```
//!
//! Blocks are separated by a line of forty or more dashes. A block that cannot be
//! turned into a question is reported as an [`Anomaly`] and parsing continues
//! with the next one.

use crate::error::BlockDefect;
use crate::types::{Anomaly, Letter, ParseReport, QuestionCollection, QuestionRecord};
use chrono::{NaiveDateTime, Timelike};
use std::collections::{BTreeMap, BTreeSet};

/// Line separating two question blocks.
pub const DELIMITER: &str = "----------------------------------------";

const SOURCE_HEADING: &str = "## Examtopics";
const ANSWER_MARKER: &str = "**Answer:";
const TIMESTAMP_MARKER: &str = "**Timestamp:";
const MARKER_CLOSE: &str = "**";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// `YYYY-MM-DD HH:MM:SS`, `9` marking a digit position.
const TIMESTAMP_SHAPE: &[u8; 19] = b"9999-99-99 99:99:99";
const SNIPPET_LEN: usize = 80;

/// Parse a document into a sorted collection plus per-block anomalies.
///
/// Never fails: an empty document yields an empty report.
pub fn parse(content: &str) -> ParseReport {
    let blocks = split_blocks(content);
    let mut records = Vec::with_capacity(blocks.len());
    let mut anomalies = Vec::new();

    for block in &blocks {
        match assemble(block) {
            Ok(record) => records.push(record),
            Err(reason) => anomalies.push(Anomaly {
                block_index: block.index,
                snippet: block.snippet(),
                reason,
            }),
        }
    }

    ParseReport {
        blocks_found: blocks.len(),
        collection: QuestionCollection::from_records(records),
        anomalies,
    }
}

/// Raw lines of one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlock<'a> {
    /// Position among the non-empty blocks, starting at 0.
    pub index: usize,
    pub lines: Vec<&'a str>,
}

impl QuestionBlock<'_> {
    /// First meaningful line, shortened for diagnostics.
    pub fn snippet(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty() && !line.contains(SOURCE_HEADING))
            .or_else(|| {
                self.lines
                    .iter()
                    .map(|line| line.trim())
                    .find(|line| !line.is_empty())
            })
            .map(|line| line.chars().take(SNIPPET_LEN).collect())
            .unwrap_or_default()
    }
}

/// Split a document on delimiter lines, dropping blank blocks.
pub fn split_blocks(content: &str) -> Vec<QuestionBlock<'_>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    // `lines` strips a trailing `\r` as well as `\n`
    for line in content.lines() {
        if is_delimiter(line) {
            push_block(&mut blocks, std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    push_block(&mut blocks, current);

    blocks
}

/// A line made only of dashes, at least as many as [`DELIMITER`].
fn is_delimiter(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= DELIMITER.len() && trimmed.bytes().all(|b| b == b'-')
}

fn push_block<'a>(blocks: &mut Vec<QuestionBlock<'a>>, lines: Vec<&'a str>) {
    if lines.iter().all(|line| line.trim().is_empty()) {
        return;
    }
    let index = blocks.len();
    blocks.push(QuestionBlock { index, lines });
}

/// Combine the extracted fields of a block into a validated record.
pub fn assemble(block: &QuestionBlock<'_>) -> Result<QuestionRecord, BlockDefect> {
    let lines = &block.lines;

    let statement = scan_statement(lines);
    let options_start = statement.options_start.ok_or(BlockDefect::NoOptions)?;
    let options = scan_options(lines, options_start)?;

    if statement.text.is_empty() {
        return Err(BlockDefect::MissingStatement);
    }

    let answers = extract_answers(lines)?;
    let timestamp = extract_timestamp(lines)?;

    if let Some(&letter) = answers.iter().find(|letter| !options.contains_key(*letter)) {
        return Err(BlockDefect::UnknownAnswer { letter });
    }

    Ok(QuestionRecord {
        statement: statement.text,
        options,
        answers,
        timestamp,
    })
}

/// Result of scanning the statement region of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementScan {
    pub text: String,
    /// Index of the first option line, if the block has one.
    pub options_start: Option<usize>,
}

/// Collect prose lines up to the first option marker.
pub fn scan_statement(lines: &[&str]) -> StatementScan {
    let mut parts = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        match Line::classify(line) {
            Line::Option { .. } => {
                return StatementScan {
                    text: parts.join("\n").trim().to_string(),
                    options_start: Some(idx),
                };
            }
            Line::Text(text) => parts.push(text),
            Line::Heading | Line::Blank | Line::Answer | Line::Timestamp => {}
        }
    }

    StatementScan {
        text: parts.join("\n").trim().to_string(),
        options_start: None,
    }
}

/// Collect lettered options starting at `start`, stopping at the answer or
/// timestamp line.
pub fn scan_options(
    lines: &[&str],
    start: usize,
) -> Result<BTreeMap<Letter, String>, BlockDefect> {
    let mut builder = OptionsBuilder::default();

    for line in lines.iter().skip(start) {
        match Line::classify(line) {
            Line::Answer | Line::Timestamp => break,
            Line::Option { letter, rest } => builder.start(letter, rest)?,
            Line::Text(text) => builder.push(text),
            Line::Heading | Line::Blank => {}
        }
    }

    Ok(builder.finish())
}

/// Read the answer letters from anywhere in the block.
pub fn extract_answers(lines: &[&str]) -> Result<BTreeSet<Letter>, BlockDefect> {
    let value = lines
        .iter()
        .find_map(|line| marker_value(line, ANSWER_MARKER))
        .ok_or(BlockDefect::MissingAnswer)?;

    let mut answers = BTreeSet::new();
    for c in value.chars().filter(|c| !c.is_whitespace() && *c != ',') {
        let letter = Letter::new(c).ok_or_else(|| BlockDefect::InvalidAnswer {
            value: value.to_string(),
        })?;
        answers.insert(letter);
    }

    if answers.is_empty() {
        return Err(BlockDefect::EmptyAnswer);
    }
    Ok(answers)
}

/// Read and parse the timestamp from anywhere in the block.
pub fn extract_timestamp(lines: &[&str]) -> Result<NaiveDateTime, BlockDefect> {
    let value = lines
        .iter()
        .find_map(|line| marker_value(line, TIMESTAMP_MARKER))
        .ok_or(BlockDefect::MissingTimestamp)?;

    let invalid = || BlockDefect::InvalidTimestamp {
        value: value.to_string(),
    };
    if !has_timestamp_shape(value) {
        return Err(invalid());
    }

    let timestamp =
        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| invalid())?;
    // chrono reads second 60 as a leap second
    if timestamp.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }
    Ok(timestamp)
}

/// Zero-padded fields with single separators, nothing else.
fn has_timestamp_shape(value: &str) -> bool {
    value.len() == TIMESTAMP_SHAPE.len()
        && value
            .bytes()
            .zip(TIMESTAMP_SHAPE.iter())
            .all(|(b, &expected)| match expected {
                b'9' => b.is_ascii_digit(),
                sep => b == sep,
            })
}

/// Text between `marker` and the closing `**` on the same line.
fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let start = line.find(marker)? + marker.len();
    let rest = &line[start..];
    let end = rest.find(MARKER_CLOSE)?;
    Some(rest[..end].trim())
}

/// `**X:** rest` at the start of a trimmed line.
fn option_marker(trimmed: &str) -> Option<(Letter, &str)> {
    let rest = trimmed.strip_prefix(MARKER_CLOSE)?;
    let mut chars = rest.chars();
    let letter = Letter::new(chars.next()?)?;
    let rest = chars.as_str().strip_prefix(":**")?;
    Some((letter, rest.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Heading,
    Blank,
    Option { letter: Letter, rest: &'a str },
    Answer,
    Timestamp,
    Text(&'a str),
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            Line::Blank
        } else if trimmed.contains(SOURCE_HEADING) {
            Line::Heading
        } else if marker_value(trimmed, ANSWER_MARKER).is_some() {
            Line::Answer
        } else if marker_value(trimmed, TIMESTAMP_MARKER).is_some() {
            Line::Timestamp
        } else if let Some((letter, rest)) = option_marker(trimmed) {
            Line::Option { letter, rest }
        } else {
            Line::Text(line)
        }
    }
}

#[derive(Default)]
struct OptionsBuilder<'a> {
    options: BTreeMap<Letter, String>,
    current: Option<Letter>,
    buffer: Vec<&'a str>,
}

impl<'a> OptionsBuilder<'a> {
    fn start(&mut self, letter: Letter, rest: &'a str) -> Result<(), BlockDefect> {
        self.flush();
        if self.options.contains_key(&letter) {
            return Err(BlockDefect::DuplicateOption { letter });
        }
        self.current = Some(letter);
        if !rest.is_empty() {
            self.buffer.push(rest);
        }
        Ok(())
    }

    fn push(&mut self, text: &'a str) {
        self.buffer.push(text);
    }

    fn flush(&mut self) {
        let text = self.buffer.join("\n");
        self.buffer.clear();

        // Text with no letter to attach to is dropped.
        if let Some(letter) = self.current.take() {
            self.options.insert(letter, text.trim().to_string());
        }
    }

    fn finish(mut self) -> BTreeMap<Letter, String> {
        self.flush();
        self.options
    }
}
