//! Directory configuration read from the environment.

use std::path::PathBuf;

const APP_DIR: &str = "exam-maker";

/// Where exams are read from and banks and results are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Source `.txt` exam documents.
    pub exams_dir: PathBuf,
    /// Parsed question banks.
    pub banks_dir: PathBuf,
    /// Exam result reports.
    pub results_dir: PathBuf,
}

impl Config {
    /// Load from `EXAM_*` environment variables.
    ///
    /// `data_dir` replaces `EXAM_DATA_DIR` when given.
    pub fn load(data_dir: Option<PathBuf>) -> Self {
        Self::from_lookup(|key| match (key, &data_dir) {
            ("EXAM_DATA_DIR", Some(dir)) => Some(dir.to_string_lossy().to_string()),
            _ => std::env::var(key).ok(),
        })
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("EXAM_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let dir = |key: &str, name: &str| {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join(name))
        };

        Self {
            exams_dir: dir("EXAM_EXAMS_DIR", "exams"),
            banks_dir: dir("EXAM_BANKS_DIR", "banks"),
            results_dir: dir("EXAM_RESULTS_DIR", "results"),
            data_dir,
        }
    }
}

fn default_data_dir() -> PathBuf {
    // Use app data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
