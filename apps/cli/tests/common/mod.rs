//! Common test utilities and fixtures for integration tests.
//!
//! Each `TestContext` owns a temporary data directory laid out the way
//! `Config` expects, so tests never touch the user's real data.

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};

use exam_maker::config::Config;
use exam_maker::state::AppState;
use tempfile::TempDir;

pub struct TestContext {
    _dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config::from_lookup(|key| match key {
            "EXAM_DATA_DIR" => Some(dir.path().to_string_lossy().to_string()),
            _ => None,
        });
        fs::create_dir_all(&config.exams_dir).expect("Failed to create exams dir");
        let state = AppState::new(config).expect("Failed to open store");

        Self { _dir: dir, state }
    }

    pub fn exams_dir(&self) -> &Path {
        &self.state.config.exams_dir
    }

    /// Write an exam document into the exams directory.
    pub fn write_exam(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.exams_dir().join(file_name);
        fs::write(&path, content).expect("Failed to write exam");
        path
    }
}
