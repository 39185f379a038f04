//! Repository pattern for question bank access.

use crate::store::error::StoreError;
use chrono::{DateTime, Utc};
use exam_core::QuestionCollection;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, StoreError>;

const BANK_EXTENSION: &str = "json";

/// A parsed exam document saved under a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub name: String,
    pub source_file: String,
    /// SHA-256 of the source document.
    pub content_hash: String,
    pub imported_at: DateTime<Utc>,
    pub questions: QuestionCollection,
}

/// Bank listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct BankSummary {
    pub name: String,
    pub question_count: usize,
    pub source_file: String,
    pub imported_at: DateTime<Utc>,
}

impl From<&QuestionBank> for BankSummary {
    fn from(bank: &QuestionBank) -> Self {
        Self {
            name: bank.name.clone(),
            question_count: bank.questions.len(),
            source_file: bank.source_file.clone(),
            imported_at: bank.imported_at,
        }
    }
}

/// Repository for question bank operations.
pub trait BankRepository {
    fn save_bank(&self, bank: &QuestionBank) -> Result<()>;
    fn find_bank(&self, name: &str) -> Result<Option<QuestionBank>>;
    fn list_banks(&self) -> Result<Vec<BankSummary>>;
    fn delete_bank(&self, name: &str) -> Result<()>;

    fn load_bank(&self, name: &str) -> Result<QuestionBank> {
        self.find_bank(name)?
            .ok_or_else(|| StoreError::BankNotFound(name.to_string()))
    }
}

/// Stores each bank as `<root>/<name>.json`.
pub struct JsonRepository {
    root: PathBuf,
}

impl JsonRepository {
    /// Open the bank directory, creating it if necessary.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn bank_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{BANK_EXTENSION}"))
    }

    fn read_bank(path: &Path) -> Result<QuestionBank> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl BankRepository for JsonRepository {
    fn save_bank(&self, bank: &QuestionBank) -> Result<()> {
        let path = self.bank_path(&bank.name);
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, serde_json::to_string_pretty(bank)?)?;
        fs::rename(&tmp_path, &path)?;

        tracing::debug!("Saved bank {} to {}", bank.name, path.display());
        Ok(())
    }

    fn find_bank(&self, name: &str) -> Result<Option<QuestionBank>> {
        match Self::read_bank(&self.bank_path(name)) {
            Ok(bank) => Ok(Some(bank)),
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn list_banks(&self) -> Result<Vec<BankSummary>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == BANK_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut banks = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read_bank(&path) {
                Ok(bank) => banks.push(BankSummary::from(&bank)),
                Err(e) => {
                    tracing::warn!("Skipping unreadable bank {}: {}", path.display(), e)
                }
            }
        }
        Ok(banks)
    }

    fn delete_bank(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.bank_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::BankNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Calculate SHA256 hash of content.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
