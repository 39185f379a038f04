//! Import and management of question banks.

use super::CommandError;
use crate::store::{hash_content, BankRepository, BankSummary, QuestionBank};
use chrono::Utc;
use exam_core::{parser, Anomaly, ParseError, ParseReport};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const EXAM_EXTENSION: &str = "txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Bank written.
    Saved,
    /// Source hash matches the stored bank; nothing written.
    Unchanged,
    /// No block produced a question; nothing written.
    NoQuestions,
}

#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub bank: String,
    pub source_file: String,
    pub status: ImportStatus,
    pub blocks_found: usize,
    pub imported: usize,
    pub anomalies: Vec<Anomaly>,
    /// A bank left over from an earlier version of the source was deleted.
    pub stale_removed: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct DirectoryImport {
    pub files: Vec<ImportResult>,
    /// Files that could not be read, with the error message.
    pub failures: Vec<(String, String)>,
}

impl DirectoryImport {
    pub fn imported(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == ImportStatus::Saved)
            .map(|f| f.imported)
            .sum()
    }
}

/// Parse a single exam document without storing it.
pub fn parse_file(path: &Path) -> Result<ParseReport, CommandError> {
    let content = fs::read_to_string(path)?;
    Ok(parser::parse(&content))
}

/// Import an exam document as a bank named after the file stem.
pub fn import_file<R: BankRepository>(
    path: &Path,
    repo: &R,
    force: bool,
) -> Result<ImportResult, CommandError> {
    let content = fs::read_to_string(path)?;
    let source_file = path.to_string_lossy().to_string();

    // Derive bank name from file path
    let bank = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("default")
        .to_string();

    let content_hash = hash_content(&content);
    if !force {
        if let Some(existing) = repo.find_bank(&bank)? {
            if existing.content_hash == content_hash {
                tracing::info!("{} unchanged, skipping", source_file);
                return Ok(ImportResult {
                    bank,
                    source_file,
                    status: ImportStatus::Unchanged,
                    blocks_found: 0,
                    imported: existing.questions.len(),
                    anomalies: Vec::new(),
                    stale_removed: false,
                });
            }
        }
    }

    let report = parser::parse(&content);
    let blocks_found = report.blocks_found;
    tracing::info!(
        "{}: {} blocks found, {} validated",
        source_file,
        blocks_found,
        report.valid_count()
    );
    for anomaly in &report.anomalies {
        tracing::warn!("{}: {}", source_file, anomaly);
    }

    let anomalies = report.anomalies.clone();
    match report.into_collection() {
        Ok(questions) => {
            let imported = questions.len();
            repo.save_bank(&QuestionBank {
                name: bank.clone(),
                source_file: source_file.clone(),
                content_hash,
                imported_at: Utc::now(),
                questions,
            })?;

            Ok(ImportResult {
                bank,
                source_file,
                status: ImportStatus::Saved,
                blocks_found,
                imported,
                anomalies,
                stale_removed: false,
            })
        }
        Err(ParseError::NoUsableQuestions { .. }) => {
            tracing::warn!("{}: no usable questions, bank not saved", source_file);

            // The stored bank no longer matches its source
            let stale_removed = repo.find_bank(&bank)?.is_some();
            if stale_removed {
                repo.delete_bank(&bank)?;
                tracing::warn!("Removed stale bank '{}'", bank);
            }

            Ok(ImportResult {
                bank,
                source_file,
                status: ImportStatus::NoQuestions,
                blocks_found,
                imported: 0,
                anomalies,
                stale_removed,
            })
        }
    }
}

/// Import every `.txt` document in a directory.
///
/// A file that cannot be read or stored is recorded and the rest are still imported.
pub fn import_directory<R: BankRepository>(
    dir: &Path,
    repo: &R,
    force: bool,
) -> Result<DirectoryImport, CommandError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == EXAM_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut result = DirectoryImport::default();
    for path in paths {
        match import_file(&path, repo, force) {
            Ok(file) => result.files.push(file),
            Err(e @ (CommandError::Io(_) | CommandError::Store(_))) => {
                tracing::error!("Failed to import {}: {}", path.display(), e);
                result
                    .failures
                    .push((path.to_string_lossy().to_string(), e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(result)
}

/// All stored banks in name order.
pub fn list_banks<R: BankRepository>(repo: &R) -> Result<Vec<BankSummary>, CommandError> {
    repo.list_banks().map_err(Into::into)
}

pub fn remove_bank<R: BankRepository>(name: &str, repo: &R) -> Result<(), CommandError> {
    repo.delete_bank(name)?;
    tracing::info!("Removed bank {}", name);
    Ok(())
}
