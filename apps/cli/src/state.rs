//! Application state.

use crate::config::Config;
use crate::store::{JsonRepository, StoreError};

/// Configuration plus the opened bank store.
pub struct AppState {
    pub config: Config,
    pub repository: JsonRepository,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, StoreError> {
        let repository = JsonRepository::open(&config.banks_dir)?;
        Ok(Self { config, repository })
    }
}
